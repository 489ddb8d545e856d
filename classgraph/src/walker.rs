//! Walks one resolved classpath element for `.class` entries and decodes
//! each one (spec.md §4.3 "classfile discovery" / §5 per-element worker).

use std::fs::File;
use std::io::{Cursor, Read};
use std::path::Path;

use classgraph_classfile::{decode, ClassNameRegistry, DecodeOutcome};
use classgraph_graph::{ClassInfo, Origin};
use classgraph_resolver::{ResolveError, ResolvedElement};
use classgraph_scanspec::{InterruptFlag, LogLevel, LogRecord, ScanSpec};
use walkdir::WalkDir;
use zip::ZipArchive;

use crate::error::{Result, ScanError};

/// Visits every `.class` entry under `element`, decoding it and handing the
/// accepted `ClassInfo` to `on_class`. `classpath_entry` is the original raw
/// classpath-element string, recorded as the resulting `Origin`.
pub fn walk_element(
    element: &ResolvedElement,
    classpath_entry: &str,
    scan_spec: &ScanSpec,
    registry: &dyn ClassNameRegistry,
    interrupt: &InterruptFlag,
    on_class: &mut dyn FnMut(ClassInfo),
) -> Result<()> {
    if element.physical_path.is_dir() {
        walk_directory(&element.physical_path, classpath_entry, scan_spec, registry, interrupt, on_class)
    } else {
        walk_archive(element, classpath_entry, scan_spec, registry, interrupt, on_class)
    }
}

fn walk_directory(
    root: &Path,
    classpath_entry: &str,
    scan_spec: &ScanSpec,
    registry: &dyn ClassNameRegistry,
    interrupt: &InterruptFlag,
    on_class: &mut dyn FnMut(ClassInfo),
) -> Result<()> {
    for entry in WalkDir::new(root).into_iter().filter_map(|e| e.ok()) {
        if interrupt.is_set() {
            return Err(ScanError::Interrupted);
        }
        if !entry.file_type().is_file() {
            continue;
        }
        if entry.path().extension().and_then(|e| e.to_str()) != Some("class") {
            continue;
        }
        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        let relative_path = relative.to_string_lossy().replace('\\', "/");

        if !is_of_interest(&relative_path, scan_spec) {
            continue;
        }

        let mut file = File::open(entry.path())
            .map_err(|source| ResolveError::Io { path: entry.path().display().to_string(), source })?;
        decode_one(&mut file, &relative_path, classpath_entry, None, scan_spec, registry, on_class);
    }
    Ok(())
}

fn walk_archive(
    element: &ResolvedElement,
    classpath_entry: &str,
    scan_spec: &ScanSpec,
    registry: &dyn ClassNameRegistry,
    interrupt: &InterruptFlag,
    on_class: &mut dyn FnMut(ClassInfo),
) -> Result<()> {
    let path = &element.physical_path;
    let file =
        File::open(path).map_err(|source| ResolveError::Io { path: path.display().to_string(), source })?;
    let mut archive = ZipArchive::new(file)
        .map_err(|source| ResolveError::Archive { path: path.display().to_string(), source })?;

    let prefix = element.package_root.clone().unwrap_or_default();
    let names: Vec<String> = (0..archive.len())
        .filter_map(|i| archive.by_index(i).ok().map(|entry| entry.name().to_string()))
        .filter(|name| !name.ends_with('/') && name.ends_with(".class") && name.starts_with(&prefix))
        .collect();

    for name in names {
        if interrupt.is_set() {
            return Err(ScanError::Interrupted);
        }
        let relative_path = name.strip_prefix(&prefix).unwrap_or(&name).to_string();
        if !is_of_interest(&relative_path, scan_spec) {
            continue;
        }

        let mut bytes = Vec::new();
        {
            let mut zip_entry = match archive.by_name(&name) {
                Ok(zip_entry) => zip_entry,
                Err(_) => continue,
            };
            if zip_entry.read_to_end(&mut bytes).is_err() {
                continue;
            }
        }
        let mut cursor = Cursor::new(bytes);
        decode_one(&mut cursor, &relative_path, classpath_entry, Some(&name), scan_spec, registry, on_class);
    }
    Ok(())
}

/// Cheap pre-filter against the whitelist/blacklist before spending an I/O
/// read and a full decode on a file the scan spec wouldn't keep anyway.
fn is_of_interest(relative_path: &str, scan_spec: &ScanSpec) -> bool {
    let fqn = relative_path.strip_suffix(".class").unwrap_or(relative_path).replace('/', ".");
    scan_spec.path_filter.is_whitelisted(&fqn)
}

#[allow(clippy::too_many_arguments)]
fn decode_one<R: Read>(
    reader: &mut R,
    relative_path: &str,
    classpath_entry: &str,
    archive_entry: Option<&str>,
    scan_spec: &ScanSpec,
    registry: &dyn ClassNameRegistry,
    on_class: &mut dyn FnMut(ClassInfo),
) {
    match decode(reader, Some(relative_path), scan_spec, registry) {
        Ok(DecodeOutcome::Accepted(decoded)) => {
            let origin = Origin::new(classpath_entry, archive_entry.map(str::to_string));
            on_class(ClassInfo {
                name: decoded.name,
                kind: decoded.kind,
                superclass_name: decoded.superclass_name,
                interface_names: decoded.interface_names,
                annotation_names: decoded.annotation_names,
                field_type_names: decoded.field_type_names,
                origin,
            });
        }
        Ok(DecodeOutcome::Masked { .. }) | Ok(DecodeOutcome::RootClass) => {}
        Err(err) => scan_spec.log(LogRecord::new(
            LogLevel::Warn,
            0,
            format!("rejected classfile {relative_path:?}: {err}"),
        )),
    }
}
