//! Exercises `Graph` purely through its public API, as an external caller
//! would, complementing the in-module unit tests in `src/builder.rs`.

use std::collections::HashSet;

use classgraph_graph::{ClassInfo, ClassKind, Graph, GraphError, Origin};
use classgraph_scanspec::InterruptFlag;

fn class(name: &str, superclass: Option<&str>, interfaces: &[&str]) -> ClassInfo {
    ClassInfo {
        name: name.to_string(),
        kind: ClassKind::StandardClass,
        superclass_name: superclass.map(|s| s.to_string()),
        interface_names: interfaces.iter().map(|s| s.to_string()).collect(),
        annotation_names: HashSet::new(),
        field_type_names: HashSet::new(),
        origin: Origin::new("test.jar", None),
    }
}

fn interface(name: &str, extends: &[&str]) -> ClassInfo {
    ClassInfo {
        name: name.to_string(),
        kind: ClassKind::Interface,
        superclass_name: None,
        interface_names: extends.iter().map(|s| s.to_string()).collect(),
        annotation_names: HashSet::new(),
        field_type_names: HashSet::new(),
        origin: Origin::new("test.jar", None),
    }
}

#[test]
fn diamond_interface_inheritance_resolves_all_implementers() {
    let mut graph = Graph::new();
    graph.accept(interface("p.Top", &[])).unwrap();
    graph.accept(interface("p.Left", &["p.Top"])).unwrap();
    graph.accept(interface("p.Right", &["p.Top"])).unwrap();
    graph.accept(class("p.Impl", Some("java.lang.Object"), &["p.Left", "p.Right"])).unwrap();
    graph.finalize(&InterruptFlag::new()).unwrap();

    let mut implementers = graph.classes_implementing("p.Top");
    implementers.sort();
    assert_eq!(implementers, vec!["p.Impl".to_string()]);

    let mut supers = graph.superinterfaces_of("p.Left");
    supers.sort();
    assert_eq!(supers, vec!["p.Top".to_string()]);
}

#[test]
fn conflicting_superclass_on_duplicate_accept_is_rejected() {
    // Duplicate FQNs are normally filtered out upstream by the decoder's
    // registry (first-wins), so `accept` only ever sees one record per name.
    // If that invariant is ever violated, a second accept with a different
    // superclass must fail loudly rather than silently overwrite state.
    let mut graph = Graph::new();
    graph.accept(class("p.A", Some("java.lang.Object"), &[])).unwrap();
    let second = graph.accept(class("p.A", Some("p.Other"), &[]));
    assert!(matches!(second, Err(GraphError::ConflictingSuperclass { .. })));

    graph.finalize(&InterruptFlag::new()).unwrap();
    assert!(graph.superclasses_of("p.A").contains(&"java.lang.Object".to_string()));
}

#[test]
fn annotated_interface_has_no_phantom_superclass() {
    // A plain interface (not an annotation type) carrying a non-meta
    // annotation has nowhere to route that annotation edge to — it must be
    // dropped, not linked into the class-super/sub chain reserved for
    // annotation types' meta-annotation graph.
    let annotated = ClassInfo {
        name: "p.I".to_string(),
        kind: ClassKind::Interface,
        superclass_name: None,
        interface_names: Vec::new(),
        annotation_names: HashSet::from(["p.A".to_string()]),
        field_type_names: HashSet::new(),
        origin: Origin::new("test.jar", None),
    };

    let mut graph = Graph::new();
    graph.accept(annotated).unwrap();
    graph.finalize(&InterruptFlag::new()).unwrap();

    assert!(graph.superclasses_of("p.I").is_empty());
    assert!(graph.subclasses_of("p.A").is_empty());
    assert!(graph.classes_with_annotation("p.A").is_empty());
}

#[test]
fn reset_clears_prior_scan_state() {
    let mut graph = Graph::new();
    graph.accept(class("p.A", Some("java.lang.Object"), &[])).unwrap();
    graph.finalize(&InterruptFlag::new()).unwrap();
    assert!(graph.all_class_names().contains(&"p.A".to_string()));

    graph.reset();
    graph.finalize(&InterruptFlag::new()).unwrap();
    assert!(graph.all_class_names().is_empty());
}
