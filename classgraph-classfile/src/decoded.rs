//! The decoder's output: a fact record for one class, or a decision to skip.

use std::collections::{HashSet, HashMap};
use std::sync::Mutex;

use classgraph_scanspec::ConstantValue;

/// One of the three class kinds the graph distinguishes (spec.md §2 data
/// model). An annotation is, per the classfile format, also an interface —
/// callers that need "is this an interface" should match
/// `ClassKind::Interface | ClassKind::Annotation`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKind {
    StandardClass,
    Interface,
    Annotation,
}

/// The fact record the decoder produces for one accepted classfile
/// (spec.md §3 `ClassInfo`, minus `origin` — the caller, which knows which
/// classpath element this byte source came from, attaches that).
#[derive(Debug, Clone)]
pub struct DecodedClass {
    pub name: String,
    pub kind: ClassKind,
    pub superclass_name: Option<String>,
    pub interface_names: Vec<String>,
    pub annotation_names: HashSet<String>,
    pub field_type_names: HashSet<String>,
    /// Static-final fields matched by the scan spec, with their coerced
    /// constant value — also delivered live through
    /// [`classgraph_scanspec::StaticFinalFieldSink`] during decode, but kept
    /// here too since tests and callers that don't register a sink still
    /// want to observe them.
    pub static_final_field_values: HashMap<String, ConstantValue>,
}

/// Outcome of decoding one classfile that didn't error out entirely.
#[derive(Debug)]
pub enum DecodeOutcome {
    Accepted(DecodedClass),
    /// This FQN was already accepted earlier in the scan; this classfile
    /// contributes nothing (spec.md §3 "first-wins").
    Masked { fqn: String },
    /// This classfile represents the root of the class hierarchy
    /// (`java.lang.Object` by convention) — the decoder emits no record for
    /// it (spec.md §4.1 step 5).
    RootClass,
}

/// Enforces "at most one classfile per FQN wins" across concurrent decoder
/// workers (spec.md §5 "ordering guarantees": an atomic first-to-register
/// check on FQN).
pub trait ClassNameRegistry: Send + Sync {
    /// Attempts to claim `fqn`. Returns `true` if this call is the first to
    /// claim it (the caller should proceed to accept the class), `false` if
    /// it was already claimed (the caller should mask).
    fn try_register(&self, fqn: &str) -> bool;
}

/// A [`ClassNameRegistry`] backed by a simple mutex-guarded set — sufficient
/// mutual exclusion for the "first to register wins" guarantee; no
/// additional ordering is implied or required beyond that.
#[derive(Debug, Default)]
pub struct InMemoryClassNameRegistry {
    seen: Mutex<HashSet<String>>,
}

impl ClassNameRegistry for InMemoryClassNameRegistry {
    fn try_register(&self, fqn: &str) -> bool {
        self.seen.lock().unwrap().insert(fqn.to_string())
    }
}
