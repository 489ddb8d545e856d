//! Scan configuration and path filtering.
//!
//! Carries the whitelist/blacklist package-prefix matcher used by both the
//! classfile decoder (to decide what to decode) and the resolver (to decide
//! what classpath elements are worth visiting), plus the diagnostics-sink and
//! static-final-field match-sink traits that the decoder reports through.

pub mod constant_value;
pub mod diagnostics;
pub mod interrupt;
pub mod path_filter;
pub mod spec;

pub use constant_value::ConstantValue;
pub use diagnostics::{DiagnosticSink, LogLevel, LogRecord, TracingDiagnosticSink};
pub use interrupt::InterruptFlag;
pub use path_filter::PathFilter;
pub use spec::{ScanSpec, ScanSpecBuilder, StaticFinalFieldSink};
