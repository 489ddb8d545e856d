//! The scan specification (spec.md §4.5).

use std::sync::Arc;

use fnv::FnvHashSet;

use crate::constant_value::ConstantValue;
use crate::diagnostics::{DiagnosticSink, LogLevel, LogRecord, NullDiagnosticSink};
use crate::path_filter::PathFilter;

/// Receives a static-final field's coerced constant value during decoding,
/// for fields the caller registered interest in via
/// [`ScanSpecBuilder::match_static_final_field`].
pub trait StaticFinalFieldSink: Send + Sync {
    fn accept(&self, class_name: &str, field_name: &str, value: &ConstantValue);
}

/// A sink that discards every match; the default when no caller registers
/// one.
#[derive(Debug, Default)]
struct NullStaticFinalFieldSink;

impl StaticFinalFieldSink for NullStaticFinalFieldSink {
    fn accept(&self, _class_name: &str, _field_name: &str, _value: &ConstantValue) {}
}

/// An explicit set of classpath roots, overriding discovery. Mutually
/// exclusive with classloader overrides (spec.md §4.5); constructing a
/// [`ScanSpec`] with both set resolves the conflict by ignoring the
/// classloader override and logging a `ConfigurationConflict` warning.
#[derive(Debug, Clone, Default)]
pub struct OverrideClasspath(pub Vec<String>);

/// Immutable configuration for one scan.
pub struct ScanSpec {
    pub path_filter: PathFilter,
    pub blacklist_system_jars_or_modules: bool,
    pub override_classpath: Option<Vec<String>>,
    pub override_classloaders: bool,
    pub ignore_parent_classloaders: bool,
    pub create_classloader_for_matches: bool,
    pub strip_self_extracting_archive_header: bool,
    pub add_nested_lib_jars_to_classpath: bool,
    pub enable_field_scanning: bool,
    static_final_fields: FnvHashSet<(String, String)>,
    static_final_field_sink: Arc<dyn StaticFinalFieldSink>,
    pub diagnostics: Arc<dyn DiagnosticSink>,
}

impl ScanSpec {
    pub fn builder() -> ScanSpecBuilder {
        ScanSpecBuilder::default()
    }

    /// Whether `class_name` was registered (by [`ScanSpecBuilder::match_static_final_field`])
    /// for static-final-field constant capture on `field_name`.
    pub fn wants_static_final_field(&self, class_name: &str, field_name: &str) -> bool {
        self.static_final_fields
            .contains(&(class_name.to_string(), field_name.to_string()))
    }

    pub fn deliver_static_final_field(&self, class_name: &str, field_name: &str, value: &ConstantValue) {
        self.static_final_field_sink.accept(class_name, field_name, value);
    }

    pub fn log(&self, record: LogRecord) {
        self.diagnostics.log(record);
    }
}

pub struct ScanSpecBuilder {
    whitelist: Vec<String>,
    blacklist: Vec<String>,
    blacklist_system_jars_or_modules: bool,
    override_classpath: Option<Vec<String>>,
    override_classloaders: bool,
    ignore_parent_classloaders: bool,
    create_classloader_for_matches: bool,
    strip_self_extracting_archive_header: bool,
    add_nested_lib_jars_to_classpath: bool,
    enable_field_scanning: bool,
    static_final_fields: FnvHashSet<(String, String)>,
    static_final_field_sink: Option<Arc<dyn StaticFinalFieldSink>>,
    diagnostics: Option<Arc<dyn DiagnosticSink>>,
}

impl Default for ScanSpecBuilder {
    fn default() -> Self {
        Self {
            whitelist: Vec::new(),
            blacklist: Vec::new(),
            blacklist_system_jars_or_modules: true,
            override_classpath: None,
            override_classloaders: false,
            ignore_parent_classloaders: false,
            create_classloader_for_matches: false,
            strip_self_extracting_archive_header: false,
            add_nested_lib_jars_to_classpath: true,
            enable_field_scanning: false,
            static_final_fields: FnvHashSet::default(),
            static_final_field_sink: None,
            diagnostics: None,
        }
    }
}

impl ScanSpecBuilder {
    pub fn whitelist_packages(mut self, packages: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.whitelist.extend(packages.into_iter().map(Into::into));
        self
    }

    pub fn blacklist_packages(mut self, packages: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.blacklist.extend(packages.into_iter().map(Into::into));
        self
    }

    pub fn blacklist_system_jars_or_modules(mut self, v: bool) -> Self {
        self.blacklist_system_jars_or_modules = v;
        self
    }

    pub fn override_classpath(mut self, roots: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.override_classpath = Some(roots.into_iter().map(Into::into).collect());
        self
    }

    pub fn override_classloaders(mut self, v: bool) -> Self {
        self.override_classloaders = v;
        self
    }

    pub fn ignore_parent_classloaders(mut self, v: bool) -> Self {
        self.ignore_parent_classloaders = v;
        self
    }

    pub fn create_classloader_for_matches(mut self, v: bool) -> Self {
        self.create_classloader_for_matches = v;
        self
    }

    pub fn strip_self_extracting_archive_header(mut self, v: bool) -> Self {
        self.strip_self_extracting_archive_header = v;
        self
    }

    pub fn add_nested_lib_jars_to_classpath(mut self, v: bool) -> Self {
        self.add_nested_lib_jars_to_classpath = v;
        self
    }

    pub fn enable_field_scanning(mut self, v: bool) -> Self {
        self.enable_field_scanning = v;
        self
    }

    pub fn match_static_final_field(mut self, class_name: impl Into<String>, field_name: impl Into<String>) -> Self {
        self.static_final_fields.insert((class_name.into(), field_name.into()));
        self
    }

    pub fn static_final_field_sink(mut self, sink: Arc<dyn StaticFinalFieldSink>) -> Self {
        self.static_final_field_sink = Some(sink);
        self
    }

    pub fn diagnostics(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.diagnostics = Some(sink);
        self
    }

    pub fn build(self) -> ScanSpec {
        let diagnostics = self
            .diagnostics
            .unwrap_or_else(|| Arc::new(NullDiagnosticSink));

        // Mutually exclusive options (spec.md §4.5): classpath override wins,
        // classloader override is ignored, and the conflict is reported as a
        // warning rather than a hard failure (spec.md §7, ConfigurationConflict).
        let override_classloaders = if self.override_classpath.is_some() && self.override_classloaders {
            diagnostics.log(
                LogRecord::new(
                    LogLevel::Warn,
                    0,
                    "both override_classpath and override_classloaders were set; \
                     ignoring override_classloaders (ConfigurationConflict)",
                )
            );
            false
        } else {
            self.override_classloaders
        };

        ScanSpec {
            path_filter: PathFilter::new(self.whitelist, self.blacklist),
            blacklist_system_jars_or_modules: self.blacklist_system_jars_or_modules,
            override_classpath: self.override_classpath,
            override_classloaders,
            ignore_parent_classloaders: self.ignore_parent_classloaders,
            create_classloader_for_matches: self.create_classloader_for_matches,
            strip_self_extracting_archive_header: self.strip_self_extracting_archive_header,
            add_nested_lib_jars_to_classpath: self.add_nested_lib_jars_to_classpath,
            enable_field_scanning: self.enable_field_scanning,
            static_final_fields: self.static_final_fields,
            static_final_field_sink: self
                .static_final_field_sink
                .unwrap_or_else(|| Arc::new(NullStaticFinalFieldSink)),
            diagnostics,
        }
    }
}
