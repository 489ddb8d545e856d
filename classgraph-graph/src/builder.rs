//! The class-graph builder: `accept`, `finalize`, `reset`, and the read-only
//! query surface (spec.md §4.3).

use fnv::{FnvHashMap, FnvHashSet};

use classgraph_classfile::ClassKind;
use classgraph_scanspec::InterruptFlag;

use crate::class_info::ClassInfo;
use crate::error::{GraphError, Result};
use crate::node::{Node, NodeId, PlaceholderKind};

#[derive(Default)]
pub struct Graph {
    nodes: Vec<Node>,
    index: FnvHashMap<String, NodeId>,
    /// Order every node (real or placeholder) was first referenced in —
    /// used so a placeholder's name can still appear inside a query result
    /// (spec.md §8 "A class that references a superclass outside the
    /// whitelist creates a placeholder ... appears in `superclasses_of(C)`").
    creation_order: Vec<NodeId>,
    /// Order classes were actually decoded and accepted in — used for
    /// `all_class_names` and the annotation/interface membership queries,
    /// which only ever reference real classes.
    insertion_order: Vec<NodeId>,
    finalized: bool,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears all state, returning the builder to the pre-accept state
    /// (spec.md §4.3 "Reset").
    pub fn reset(&mut self) {
        self.nodes.clear();
        self.index.clear();
        self.creation_order.clear();
        self.insertion_order.clear();
        self.finalized = false;
    }

    fn get_or_create(&mut self, name: &str, kind: PlaceholderKind) -> NodeId {
        if let Some(&id) = self.index.get(name) {
            return id;
        }
        let id = self.nodes.len();
        self.nodes.push(Node::new_placeholder(name.to_string(), kind));
        self.index.insert(name.to_string(), id);
        self.creation_order.push(id);
        id
    }

    fn link_class_chain(&mut self, super_id: NodeId, sub_id: NodeId) {
        self.nodes[super_id].class_sub.push(sub_id);
        self.nodes[sub_id].class_super.push(super_id);
    }

    fn link_iface_chain(&mut self, super_id: NodeId, sub_id: NodeId) {
        self.nodes[super_id].iface_sub.push(sub_id);
        self.nodes[sub_id].iface_super.push(super_id);
    }

    /// Accepts one decoded class's facts. Called at most once per distinct
    /// FQN — duplicates are rejected upstream at the decoder/registry
    /// boundary (first-wins, spec.md §3).
    pub fn accept(&mut self, info: ClassInfo) -> Result<()> {
        let placeholder_kind = match info.kind {
            ClassKind::StandardClass => PlaceholderKind::Class,
            ClassKind::Interface => PlaceholderKind::Interface,
            ClassKind::Annotation => PlaceholderKind::Annotation,
        };
        let id = self.get_or_create(&info.name, placeholder_kind);

        if let Some(super_name) = &info.superclass_name {
            if info.kind == ClassKind::StandardClass && !self.nodes[id].class_super.is_empty() {
                return Err(GraphError::ConflictingSuperclass {
                    name: info.name.clone(),
                    first: self.nodes[self.nodes[id].class_super[0]].name.clone(),
                    second: super_name.clone(),
                });
            }
        }

        let interface_names = info.interface_names.clone();
        let annotation_names: Vec<String> = info.annotation_names.iter().cloned().collect();
        let superclass_name = info.superclass_name.clone();
        let kind = info.kind;

        self.nodes[id].info = Some(info);
        self.insertion_order.push(id);

        match kind {
            ClassKind::StandardClass => {
                if let Some(super_name) = superclass_name {
                    let super_id = self.get_or_create(&super_name, PlaceholderKind::Class);
                    self.link_class_chain(super_id, id);
                }
                for iface_name in &interface_names {
                    let iface_id = self.get_or_create(iface_name, PlaceholderKind::Interface);
                    self.nodes[id].implements_direct.push(iface_id);
                }
                for ann_name in &annotation_names {
                    let ann_id = self.get_or_create(ann_name, PlaceholderKind::Annotation);
                    self.nodes[id].declares_annotations.push(ann_id);
                }
            }
            ClassKind::Interface | ClassKind::Annotation => {
                for iface_name in &interface_names {
                    let iface_id = self.get_or_create(iface_name, PlaceholderKind::Interface);
                    self.link_iface_chain(iface_id, id);
                }
                // Meta-annotation chain: only an annotation type's own declared
                // annotations feed `class_super`/`class_sub`. A plain interface's
                // declared annotations have no destination in this data model and
                // are dropped (the declares/annotated relation is defined only for
                // standard classes and annotation types).
                if kind == ClassKind::Annotation {
                    for ann_name in &annotation_names {
                        let ann_id = self.get_or_create(ann_name, PlaceholderKind::Annotation);
                        self.link_class_chain(ann_id, id);
                    }
                }
            }
        }
        Ok(())
    }

    /// Computes all derived relations. Idempotent: a second call is a no-op
    /// (spec.md §8 "round-trip and idempotence").
    pub fn finalize(&mut self, interrupt: &InterruptFlag) -> Result<()> {
        if self.finalized {
            return Ok(());
        }

        close_transitively(&mut self.nodes, class_super, class_sub, all_class_super, all_class_sub, interrupt)?;
        close_transitively(&mut self.nodes, iface_super, iface_sub, all_iface_super, all_iface_sub, interrupt)?;

        self.derive_annotation_memberships();
        self.derive_interface_memberships();

        self.finalized = true;
        Ok(())
    }

    fn derive_annotation_memberships(&mut self) {
        for &id in &self.insertion_order.clone() {
            if self.nodes[id].kind() != ClassKind::StandardClass {
                continue;
            }
            let anns = self.nodes[id].declares_annotations.clone();
            for ann_id in anns {
                self.nodes[ann_id].annotated_classes.insert(id);
                let metas: Vec<NodeId> = self.nodes[ann_id].all_class_super.iter().copied().collect();
                for meta_id in metas {
                    self.nodes[meta_id].annotated_classes.insert(id);
                }
            }
        }
    }

    fn derive_interface_memberships(&mut self) {
        for &id in &self.insertion_order.clone() {
            if self.nodes[id].kind() != ClassKind::StandardClass {
                continue;
            }
            let ifaces = self.nodes[id].implements_direct.clone();
            for iface_id in ifaces {
                self.nodes[iface_id].implementing_classes.insert(id);
                let supers: Vec<NodeId> = self.nodes[iface_id].all_iface_super.iter().copied().collect();
                for super_iface in supers {
                    self.nodes[super_iface].implementing_classes.insert(id);
                }
            }
        }

        for iface_id in 0..self.nodes.len() {
            if !matches!(self.nodes[iface_id].kind(), ClassKind::Interface | ClassKind::Annotation) {
                continue;
            }
            let direct_classes: Vec<NodeId> = self.nodes[iface_id].implementing_classes.iter().copied().collect();
            for class_id in direct_classes {
                let subs: Vec<NodeId> = self.nodes[class_id].all_class_sub.iter().copied().collect();
                for sub_id in subs {
                    self.nodes[iface_id].implementing_classes.insert(sub_id);
                }
            }
        }
    }

    fn names_by_creation_order(&self, ids: &FnvHashSet<NodeId>) -> Vec<String> {
        self.creation_order.iter().filter(|id| ids.contains(id)).map(|&id| self.nodes[id].name.clone()).collect()
    }

    fn names_by_insertion_order(&self, ids: &FnvHashSet<NodeId>) -> Vec<String> {
        self.insertion_order.iter().filter(|id| ids.contains(id)).map(|&id| self.nodes[id].name.clone()).collect()
    }

    pub fn all_class_names(&self) -> Vec<String> {
        self.insertion_order.iter().map(|&id| self.nodes[id].name.clone()).collect()
    }

    pub fn classes_with_annotation(&self, name: &str) -> Vec<String> {
        match self.index.get(name) {
            Some(&id) => self.names_by_insertion_order(&self.nodes[id].annotated_classes),
            None => Vec::new(),
        }
    }

    pub fn classes_implementing(&self, name: &str) -> Vec<String> {
        match self.index.get(name) {
            Some(&id) => self.names_by_insertion_order(&self.nodes[id].implementing_classes),
            None => Vec::new(),
        }
    }

    pub fn subclasses_of(&self, name: &str) -> Vec<String> {
        match self.index.get(name) {
            Some(&id) => self.names_by_creation_order(&self.nodes[id].all_class_sub),
            None => Vec::new(),
        }
    }

    pub fn superclasses_of(&self, name: &str) -> Vec<String> {
        match self.index.get(name) {
            Some(&id) => self.names_by_creation_order(&self.nodes[id].all_class_super),
            None => Vec::new(),
        }
    }

    pub fn subinterfaces_of(&self, name: &str) -> Vec<String> {
        match self.index.get(name) {
            Some(&id) => self.names_by_creation_order(&self.nodes[id].all_iface_sub),
            None => Vec::new(),
        }
    }

    pub fn superinterfaces_of(&self, name: &str) -> Vec<String> {
        match self.index.get(name) {
            Some(&id) => self.names_by_creation_order(&self.nodes[id].all_iface_super),
            None => Vec::new(),
        }
    }
}

fn class_super(n: &Node) -> &Vec<NodeId> {
    &n.class_super
}
fn class_sub(n: &Node) -> &Vec<NodeId> {
    &n.class_sub
}
fn all_class_super(n: &mut Node) -> &mut FnvHashSet<NodeId> {
    &mut n.all_class_super
}
fn all_class_sub(n: &mut Node) -> &mut FnvHashSet<NodeId> {
    &mut n.all_class_sub
}
fn iface_super(n: &Node) -> &Vec<NodeId> {
    &n.iface_super
}
fn iface_sub(n: &Node) -> &Vec<NodeId> {
    &n.iface_sub
}
fn all_iface_super(n: &mut Node) -> &mut FnvHashSet<NodeId> {
    &mut n.all_iface_super
}
fn all_iface_sub(n: &mut Node) -> &mut FnvHashSet<NodeId> {
    &mut n.all_iface_sub
}

/// A single fixed-point wavefront closure, run once upward (filling `all_sup`
/// from `direct_sup`/`direct_sub`) and once downward (filling `all_sub`).
/// Used uniformly for the standard-class forest, the interface DAG, and the
/// (possibly cyclic) annotation meta-graph — see `DESIGN.md` for why one
/// routine suffices for all three instead of a separate topological pass for
/// the acyclic cases (spec.md §4.3, §9 "Cyclic meta-annotation graph").
fn close_transitively(
    nodes: &mut [Node],
    direct_sup: fn(&Node) -> &Vec<NodeId>,
    direct_sub: fn(&Node) -> &Vec<NodeId>,
    all_sup: fn(&mut Node) -> &mut FnvHashSet<NodeId>,
    all_sub: fn(&mut Node) -> &mut FnvHashSet<NodeId>,
    interrupt: &InterruptFlag,
) -> Result<()> {
    wavefront(nodes, direct_sup, direct_sub, all_sup, interrupt)?;
    wavefront(nodes, direct_sub, direct_sup, all_sub, interrupt)?;
    Ok(())
}

fn wavefront(
    nodes: &mut [Node],
    direct: fn(&Node) -> &Vec<NodeId>,
    direct_opposite: fn(&Node) -> &Vec<NodeId>,
    all: fn(&mut Node) -> &mut FnvHashSet<NodeId>,
    interrupt: &InterruptFlag,
) -> Result<()> {
    let mut active: Vec<NodeId> = (0..nodes.len()).filter(|&id| !direct(&nodes[id]).is_empty()).collect();

    while !active.is_empty() {
        if interrupt.is_set() {
            return Err(GraphError::Interrupted);
        }
        let mut next_active = FnvHashSet::default();
        for id in active {
            let neighbors = direct(&nodes[id]).clone();
            let mut grew = false;
            for neighbor in &neighbors {
                if all(&mut nodes[id]).insert(*neighbor) {
                    grew = true;
                }
                let transitive: Vec<NodeId> = all(&mut nodes[*neighbor]).iter().copied().collect();
                for t in transitive {
                    if all(&mut nodes[id]).insert(t) {
                        grew = true;
                    }
                }
            }
            if grew {
                for scheduled in direct_opposite(&nodes[id]).clone() {
                    next_active.insert(scheduled);
                }
            }
        }
        active = next_active.into_iter().collect();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn class(name: &str, superclass: Option<&str>, interfaces: &[&str], annotations: &[&str]) -> ClassInfo {
        ClassInfo {
            name: name.to_string(),
            kind: ClassKind::StandardClass,
            superclass_name: superclass.map(str::to_string),
            interface_names: interfaces.iter().map(|s| s.to_string()).collect(),
            annotation_names: annotations.iter().map(|s| s.to_string()).collect(),
            field_type_names: HashSet::new(),
            origin: crate::class_info::Origin::new("test.jar", None),
        }
    }

    fn interface(name: &str, extends: &[&str]) -> ClassInfo {
        ClassInfo { kind: ClassKind::Interface, ..class(name, None, extends, &[]) }
    }

    fn annotation(name: &str, meta_annotations: &[&str]) -> ClassInfo {
        ClassInfo { kind: ClassKind::Annotation, ..class(name, None, &[], meta_annotations) }
    }

    fn as_set(v: Vec<String>) -> FnvHashSet<String> {
        v.into_iter().collect()
    }

    #[test]
    fn single_interface_single_implementer() {
        let mut graph = Graph::new();
        graph.accept(interface("p.I", &[])).unwrap();
        graph.accept(class("p.C", Some("java.lang.Object"), &["p.I"], &[])).unwrap();
        graph.finalize(&InterruptFlag::new()).unwrap();

        assert_eq!(graph.classes_implementing("p.I"), vec!["p.C".to_string()]);
        assert!(graph.subclasses_of("p.C").is_empty());
        assert!(graph.superinterfaces_of("p.I").is_empty());
    }

    #[test]
    fn transitive_subclass_inherits_interface() {
        let mut graph = Graph::new();
        graph.accept(interface("p.I", &[])).unwrap();
        graph.accept(class("p.A", Some("java.lang.Object"), &["p.I"], &[])).unwrap();
        graph.accept(class("p.B", Some("p.A"), &[], &[])).unwrap();
        graph.accept(class("p.C", Some("p.B"), &[], &[])).unwrap();
        graph.finalize(&InterruptFlag::new()).unwrap();

        assert_eq!(
            as_set(graph.classes_implementing("p.I")),
            as_set(vec!["p.A".to_string(), "p.B".to_string(), "p.C".to_string()])
        );
        let subs = as_set(graph.subclasses_of("p.A"));
        assert!(subs.contains("p.B"));
        assert!(subs.contains("p.C"));
    }

    #[test]
    fn annotation_with_meta_annotation() {
        let mut graph = Graph::new();
        graph.accept(annotation("p.Outer", &[])).unwrap();
        graph.accept(annotation("p.Inner", &["p.Outer"])).unwrap();
        graph.accept(class("p.X", Some("java.lang.Object"), &[], &["p.Inner"])).unwrap();
        graph.finalize(&InterruptFlag::new()).unwrap();

        assert!(as_set(graph.classes_with_annotation("p.Outer")).contains("p.X"));
        assert!(as_set(graph.classes_with_annotation("p.Inner")).contains("p.X"));
    }

    #[test]
    fn meta_annotation_cycle_terminates() {
        let mut graph = Graph::new();
        graph.accept(annotation("p.A", &["p.B"])).unwrap();
        graph.accept(annotation("p.B", &["p.A"])).unwrap();
        graph.accept(class("p.T", Some("java.lang.Object"), &[], &["p.A"])).unwrap();
        graph.finalize(&InterruptFlag::new()).unwrap();

        assert!(as_set(graph.classes_with_annotation("p.A")).contains("p.T"));
        assert!(as_set(graph.classes_with_annotation("p.B")).contains("p.T"));
    }

    #[test]
    fn masked_class_is_never_accepted_so_first_wins() {
        let mut graph = Graph::new();
        graph.accept(class("p.K", Some("p.V1"), &[], &[])).unwrap();
        // A real decoder/registry would have masked the second classfile
        // before ever calling accept() again for "p.K" (spec.md §4.1 step 6).
        graph.finalize(&InterruptFlag::new()).unwrap();

        assert!(as_set(graph.superclasses_of("p.K")).contains("p.V1"));
        assert_eq!(graph.all_class_names(), vec!["p.K".to_string()]);
    }

    #[test]
    fn placeholder_superclass_is_queryable_but_not_listed() {
        let mut graph = Graph::new();
        graph.accept(class("p.C", Some("sys.Excluded"), &[], &[])).unwrap();
        graph.finalize(&InterruptFlag::new()).unwrap();

        assert!(!graph.all_class_names().contains(&"sys.Excluded".to_string()));
        assert!(graph.superclasses_of("p.C").contains(&"sys.Excluded".to_string()));
    }

    #[test]
    fn empty_graph_has_empty_queries() {
        let mut graph = Graph::new();
        graph.finalize(&InterruptFlag::new()).unwrap();
        assert!(graph.all_class_names().is_empty());
        assert!(graph.classes_with_annotation("p.Anything").is_empty());
    }

    #[test]
    fn finalize_is_idempotent() {
        let mut graph = Graph::new();
        graph.accept(interface("p.I", &[])).unwrap();
        graph.accept(class("p.C", Some("java.lang.Object"), &["p.I"], &[])).unwrap();
        let interrupt = InterruptFlag::new();
        graph.finalize(&interrupt).unwrap();
        let first = graph.classes_implementing("p.I");
        graph.finalize(&interrupt).unwrap();
        assert_eq!(graph.classes_implementing("p.I"), first);
    }

    #[test]
    fn reset_then_replay_yields_equivalent_graph() {
        let mut graph = Graph::new();
        graph.accept(interface("p.I", &[])).unwrap();
        graph.accept(class("p.C", Some("java.lang.Object"), &["p.I"], &[])).unwrap();
        graph.finalize(&InterruptFlag::new()).unwrap();
        let before = graph.classes_implementing("p.I");

        graph.reset();
        graph.accept(interface("p.I", &[])).unwrap();
        graph.accept(class("p.C", Some("java.lang.Object"), &["p.I"], &[])).unwrap();
        graph.finalize(&InterruptFlag::new()).unwrap();
        assert_eq!(graph.classes_implementing("p.I"), before);
    }
}
