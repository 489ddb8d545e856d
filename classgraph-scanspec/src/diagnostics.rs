//! The single diagnostics sink the core reports through (spec.md §6).
//!
//! The core never logs directly to stdout/stderr; every component is handed
//! a `Arc<dyn DiagnosticSink>` and reports through it. This keeps "how
//! diagnostics are displayed" an external concern (as spec.md §1 requires)
//! while still giving every component a scan-scoped place to report through,
//! replacing the teacher's process-wide verbosity flag per the REDESIGN FLAG
//! in spec.md §9.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

/// One structured log record.
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub level: LogLevel,
    /// Stable sort key so records can be ordered deterministically even when
    /// emitted concurrently from multiple workers.
    pub sort_key: u64,
    pub indent: u16,
    pub elapsed: Option<Duration>,
    pub error: Option<String>,
    pub message: String,
}

impl LogRecord {
    pub fn new(level: LogLevel, sort_key: u64, message: impl Into<String>) -> Self {
        Self {
            level,
            sort_key,
            indent: 0,
            elapsed: None,
            error: None,
            message: message.into(),
        }
    }

    pub fn with_indent(mut self, indent: u16) -> Self {
        self.indent = indent;
        self
    }

    pub fn with_elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed = Some(elapsed);
        self
    }

    pub fn with_error(mut self, error: impl std::fmt::Display) -> Self {
        self.error = Some(error.to_string());
        self
    }
}

/// Receives structured log records from every component of a scan.
pub trait DiagnosticSink: Send + Sync {
    fn log(&self, record: LogRecord);
}

/// Default sink: forwards every record as a `tracing` event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnosticSink;

impl DiagnosticSink for TracingDiagnosticSink {
    fn log(&self, record: LogRecord) {
        match record.level {
            LogLevel::Info => tracing::info!(
                sort_key = record.sort_key,
                indent = record.indent,
                elapsed_ms = record.elapsed.map(|d| d.as_millis() as u64),
                error = record.error.as_deref(),
                "{}",
                record.message
            ),
            LogLevel::Warn => tracing::warn!(
                sort_key = record.sort_key,
                indent = record.indent,
                elapsed_ms = record.elapsed.map(|d| d.as_millis() as u64),
                error = record.error.as_deref(),
                "{}",
                record.message
            ),
            LogLevel::Error => tracing::error!(
                sort_key = record.sort_key,
                indent = record.indent,
                elapsed_ms = record.elapsed.map(|d| d.as_millis() as u64),
                error = record.error.as_deref(),
                "{}",
                record.message
            ),
        }
    }
}

/// A sink that drops every record; useful for tests that don't care about
/// diagnostics output.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullDiagnosticSink;

impl DiagnosticSink for NullDiagnosticSink {
    fn log(&self, _record: LogRecord) {}
}
