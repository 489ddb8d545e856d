//! The finalized scan result: a thin wrapper exposing the graph's read-only
//! query surface (spec.md §4.3 "Query surface") to callers who never need to
//! touch `classgraph-graph` directly.

use classgraph_graph::Graph;

pub struct ScanResult {
    graph: Graph,
}

impl ScanResult {
    pub(crate) fn new(graph: Graph) -> Self {
        Self { graph }
    }

    pub fn all_class_names(&self) -> Vec<String> {
        self.graph.all_class_names()
    }

    pub fn classes_with_annotation(&self, name: &str) -> Vec<String> {
        self.graph.classes_with_annotation(name)
    }

    pub fn classes_implementing(&self, name: &str) -> Vec<String> {
        self.graph.classes_implementing(name)
    }

    pub fn subclasses_of(&self, name: &str) -> Vec<String> {
        self.graph.subclasses_of(name)
    }

    pub fn superclasses_of(&self, name: &str) -> Vec<String> {
        self.graph.superclasses_of(name)
    }

    pub fn subinterfaces_of(&self, name: &str) -> Vec<String> {
        self.graph.subinterfaces_of(name)
    }

    pub fn superinterfaces_of(&self, name: &str) -> Vec<String> {
        self.graph.superinterfaces_of(name)
    }
}
