//! Wires resolver -> decoder -> graph builder into one `scan()` entry point
//! (spec.md §5 concurrency model, §6 external interface).

use std::collections::{HashSet, VecDeque};
use std::sync::mpsc;

use classgraph_classfile::InMemoryClassNameRegistry;
use classgraph_graph::{ClassInfo, Graph};
use classgraph_resolver::{ResolvedElement, Resolver};
use classgraph_scanspec::{InterruptFlag, LogLevel, LogRecord, ScanSpec};

use crate::error::{Result, ScanError};
use crate::result::ScanResult;
use crate::walker;

/// Scans `classpath_roots` (or `scan_spec.override_classpath`, when set)
/// according to `scan_spec` and returns the finalized class graph.
///
/// Resolution of manifest `Class-Path` entries and nested lib jars is
/// breadth-first and runs on the calling thread (spec.md §4.2 is itself
/// concurrency-safe via its singleton map, but expanding the classpath list
/// is inherently sequential: each element can only be queued once its
/// containing element has been resolved). Per-element classfile discovery
/// and decoding then run in parallel; the decoded records are consumed by a
/// single thread so that graph insertion is always serialized.
pub fn scan(scan_spec: &ScanSpec, classpath_roots: &[String]) -> Result<ScanResult> {
    let interrupt = InterruptFlag::new();
    let resolver = Resolver::new(scan_spec);
    let registry = InMemoryClassNameRegistry::default();

    let roots: Vec<String> = match &scan_spec.override_classpath {
        Some(roots) => roots.clone(),
        None => classpath_roots.to_vec(),
    };

    let resolved = expand_classpath(&resolver, scan_spec, roots, &interrupt)?;

    let mut graph = Graph::new();
    let (tx, rx) = mpsc::channel::<ClassInfo>();

    rayon::scope(|scope| {
        for (raw_path, element) in &resolved {
            let tx = tx.clone();
            let registry = &registry;
            let interrupt = &interrupt;
            scope.spawn(move |_| {
                let mut forward = |info: ClassInfo| {
                    let _ = tx.send(info);
                };
                if let Err(err) = walker::walk_element(element, raw_path, scan_spec, registry, interrupt, &mut forward)
                {
                    scan_spec.log(LogRecord::new(
                        LogLevel::Warn,
                        0,
                        format!("failed to walk classpath element {raw_path:?}: {err}"),
                    ));
                }
            });
        }
    });
    drop(tx);

    for info in rx {
        graph.accept(info)?;
    }

    if interrupt.is_set() {
        return Err(ScanError::Interrupted);
    }

    graph.finalize(&interrupt)?;
    resolver.close()?;

    Ok(ScanResult::new(graph))
}

/// Breadth-first resolution of every classpath-element path string,
/// including those discovered transitively through a manifest `Class-Path`
/// or a nested lib directory (spec.md §4.2), deduplicating by raw path so a
/// diamond of `Class-Path` references is only resolved once.
fn expand_classpath(
    resolver: &Resolver,
    scan_spec: &ScanSpec,
    roots: Vec<String>,
    interrupt: &InterruptFlag,
) -> Result<Vec<(String, ResolvedElement)>> {
    let mut queue: VecDeque<String> = roots.into_iter().collect();
    let mut seen = HashSet::new();
    let mut resolved = Vec::new();

    while let Some(raw_path) = queue.pop_front() {
        if interrupt.is_set() {
            return Err(ScanError::Interrupted);
        }
        if !seen.insert(raw_path.clone()) {
            continue;
        }

        let element = match resolver.resolve(&raw_path, interrupt) {
            Ok(element) => element,
            Err(err) => {
                scan_spec.log(LogRecord::new(
                    LogLevel::Warn,
                    0,
                    format!("failed to resolve classpath element {raw_path:?}: {err}"),
                ));
                continue;
            }
        };

        if scan_spec.blacklist_system_jars_or_modules && element.is_system {
            continue;
        }

        if scan_spec.add_nested_lib_jars_to_classpath {
            for extra in &element.additional_classpath {
                queue.push_back(extra.clone());
            }
        }

        resolved.push((raw_path, element));
    }

    Ok(resolved)
}
