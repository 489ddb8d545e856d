//! Internal node representation (spec.md §3 `GraphNode`, §9 "Multiple
//! inheritance of graph state": one tagged-variant structure instead of a
//! class/interface/annotation inheritance chain).

use fnv::FnvHashSet;

use crate::class_info::ClassInfo;
use classgraph_classfile::ClassKind;

pub type NodeId = usize;

/// How a node entered the graph before (if ever) its classfile was decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderKind {
    Class,
    Interface,
    Annotation,
}

impl From<PlaceholderKind> for ClassKind {
    fn from(kind: PlaceholderKind) -> Self {
        match kind {
            PlaceholderKind::Class => ClassKind::StandardClass,
            PlaceholderKind::Interface => ClassKind::Interface,
            PlaceholderKind::Annotation => ClassKind::Annotation,
        }
    }
}

pub(crate) struct Node {
    pub name: String,
    /// `Some` once this FQN's classfile has actually been decoded and
    /// accepted; `None` while it is only known as someone else's
    /// super/interface/annotation reference.
    pub info: Option<ClassInfo>,
    /// The kind this node was first referenced as, used to classify
    /// placeholders (spec.md §4.3 finalize step 1).
    pub placeholder_kind: PlaceholderKind,

    /// Single-inheritance chain for standard classes (superclass_name) and,
    /// reused for the meta-annotation graph, for annotations
    /// (annotation_names) — see `DESIGN.md` for why both relations share one
    /// field and one closure algorithm.
    pub class_super: Vec<NodeId>,
    pub class_sub: Vec<NodeId>,
    pub all_class_super: FnvHashSet<NodeId>,
    pub all_class_sub: FnvHashSet<NodeId>,

    /// Interface-extends chain, populated only for `Interface`/`Annotation`
    /// kind nodes from their own `interface_names`.
    pub iface_super: Vec<NodeId>,
    pub iface_sub: Vec<NodeId>,
    pub all_iface_super: FnvHashSet<NodeId>,
    pub all_iface_sub: FnvHashSet<NodeId>,

    /// Standard classes only: interfaces named in `implements` (input data).
    pub implements_direct: Vec<NodeId>,
    /// Interfaces/annotations only: classes derived to implement this
    /// interface, directly or via a subclass or superinterface.
    pub implementing_classes: FnvHashSet<NodeId>,

    /// Standard classes only: annotations named on the class (input data).
    pub declares_annotations: Vec<NodeId>,
    /// Annotations only: classes derived to carry this annotation, directly
    /// or via a meta-annotated sub-annotation.
    pub annotated_classes: FnvHashSet<NodeId>,
}

impl Node {
    pub fn new_placeholder(name: String, placeholder_kind: PlaceholderKind) -> Self {
        Self {
            name,
            info: None,
            placeholder_kind,
            class_super: Vec::new(),
            class_sub: Vec::new(),
            all_class_super: FnvHashSet::default(),
            all_class_sub: FnvHashSet::default(),
            iface_super: Vec::new(),
            iface_sub: Vec::new(),
            all_iface_super: FnvHashSet::default(),
            all_iface_sub: FnvHashSet::default(),
            implements_direct: Vec::new(),
            implementing_classes: FnvHashSet::default(),
            declares_annotations: Vec::new(),
            annotated_classes: FnvHashSet::default(),
        }
    }

    /// `None` for a placeholder; otherwise the kind the decoder classified
    /// this class as.
    pub fn kind(&self) -> ClassKind {
        self.info.as_ref().map(|i| i.kind).unwrap_or_else(|| self.placeholder_kind.into())
    }

    pub fn is_real(&self) -> bool {
        self.info.is_some()
    }
}
