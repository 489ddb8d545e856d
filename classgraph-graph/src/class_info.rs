//! The per-class fact record the graph accumulates (spec.md §3 `ClassInfo`).

use std::collections::HashSet;

pub use classgraph_classfile::ClassKind;

/// Where a `ClassInfo` was first observed — a classpath element, and
/// optionally the path of the entry within it (nested-archive chains).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    pub classpath_element: String,
    pub path_in_archive: Option<String>,
}

impl Origin {
    pub fn new(classpath_element: impl Into<String>, path_in_archive: Option<String>) -> Self {
        Self { classpath_element: classpath_element.into(), path_in_archive }
    }
}

/// One fully-qualified class's accumulated facts, as accepted into the graph.
#[derive(Debug, Clone)]
pub struct ClassInfo {
    pub name: String,
    pub kind: ClassKind,
    pub superclass_name: Option<String>,
    pub interface_names: Vec<String>,
    pub annotation_names: HashSet<String>,
    pub field_type_names: HashSet<String>,
    pub origin: Origin,
}

impl ClassInfo {
    pub fn is_interface_like(&self) -> bool {
        matches!(self.kind, ClassKind::Interface | ClassKind::Annotation)
    }
}
