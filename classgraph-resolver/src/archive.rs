//! Self-extracting-archive header stripping and package-root discovery
//! (spec.md §4.2 "Self-extracting-archive prefix", "Inner-archive
//! extraction", "Package root discovery").

use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use zip::ZipArchive;

use crate::error::ResolveError;
use crate::manifest::ManifestInfo;
use crate::temp_registry::TempRegistry;

const ZIP_MAGIC: &[u8; 2] = b"PK";

/// If `path` has bytes before the archive's `PK` magic (a self-extracting
/// installer stub), copies from the first `PK` occurrence onward into a new
/// temp file and returns its path. Errors if no `PK` marker is found at all.
pub fn strip_self_extracting_header(path: &Path, temp_registry: &TempRegistry) -> Result<PathBuf, ResolveError> {
    let bytes =
        std::fs::read(path).map_err(|source| ResolveError::Io { path: path.display().to_string(), source })?;

    let offset = bytes
        .windows(ZIP_MAGIC.len())
        .position(|w| w == ZIP_MAGIC)
        .ok_or_else(|| ResolveError::MissingSelfExtractingMarker { path: path.display().to_string() })?;

    let mut temp = tempfile::NamedTempFile::new()
        .map_err(|source| ResolveError::Io { path: path.display().to_string(), source })?;
    temp.write_all(&bytes[offset..])
        .map_err(|source| ResolveError::Io { path: path.display().to_string(), source })?;
    let (_, temp_path) = temp
        .keep()
        .map_err(|e| ResolveError::Io { path: path.display().to_string(), source: e.error })?;
    temp_registry.register(temp_path.clone());
    Ok(temp_path)
}

/// Extracts entry `entry_name` out of `archive` into a uniquely-named temp
/// file, registering it for cleanup, and returns its path.
pub fn extract_entry_to_temp_file(
    archive: &mut ZipArchive<File>,
    entry_name: &str,
    archive_path: &str,
    temp_registry: &TempRegistry,
) -> Result<PathBuf, ResolveError> {
    let mut entry = archive.by_name(entry_name).map_err(|_| ResolveError::EntryNotFound {
        path: archive_path.to_string(),
        entry: entry_name.to_string(),
    })?;

    let mut contents = Vec::with_capacity(entry.size() as usize);
    entry
        .read_to_end(&mut contents)
        .map_err(|source| ResolveError::Io { path: archive_path.to_string(), source })?;
    drop(entry);

    let mut temp = tempfile::NamedTempFile::new()
        .map_err(|source| ResolveError::Io { path: archive_path.to_string(), source })?;
    temp.write_all(&contents).map_err(|source| ResolveError::Io { path: archive_path.to_string(), source })?;
    let (_, temp_path) =
        temp.keep().map_err(|e| ResolveError::Io { path: archive_path.to_string(), source: e.error })?;
    temp_registry.register(temp_path.clone());
    Ok(temp_path)
}

/// Package roots and nested lib archives discovered while enumerating one
/// top-level archive's entries (spec.md §4.2 "Package root discovery").
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PackageRoots {
    pub spring_boot_classes_root: Option<String>,
    pub war_classes_root: Option<String>,
    /// Entry names of nested `.jar`s to add to the classpath, in archive
    /// iteration order.
    pub nested_lib_jars: Vec<String>,
}

const WEB_INF_CLASSES: &str = "WEB-INF/classes/";
const DEFAULT_LIB_DIRS: &[&str] = &["WEB-INF/lib/", "WEB-INF/lib-provided/", "lib/"];

pub fn discover_package_roots(archive: &mut ZipArchive<File>, manifest: &ManifestInfo) -> PackageRoots {
    let boot_classes_prefix = manifest.spring_boot_classes.as_deref().unwrap_or("BOOT-INF/classes/");
    let boot_lib_prefix = manifest.spring_boot_lib.as_deref().unwrap_or("BOOT-INF/lib/");

    let mut roots = PackageRoots::default();
    for index in 0..archive.len() {
        let Ok(entry) = archive.by_index(index) else { continue };
        let name = entry.name().to_string();
        drop(entry);

        if name.starts_with(boot_classes_prefix) && roots.spring_boot_classes_root.is_none() {
            roots.spring_boot_classes_root = Some(boot_classes_prefix.to_string());
        }
        if name.starts_with(WEB_INF_CLASSES) && roots.war_classes_root.is_none() {
            roots.war_classes_root = Some(WEB_INF_CLASSES.to_string());
        }
        if name.ends_with(".jar")
            && (name.starts_with(boot_lib_prefix) || DEFAULT_LIB_DIRS.iter().any(|dir| name.starts_with(dir)))
        {
            roots.nested_lib_jars.push(name);
        }
    }
    roots
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_zip_with_prefix(path: &Path, prefix_junk: &[u8]) {
        let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
        writer.start_file("p/C.class", zip::write::SimpleFileOptions::default()).unwrap();
        writer.write_all(b"classbytes").unwrap();
        let cursor = writer.finish().unwrap();

        let mut bytes = prefix_junk.to_vec();
        bytes.extend_from_slice(&cursor.into_inner());
        std::fs::write(path, &bytes).unwrap();
    }

    #[test]
    fn strips_bytes_before_pk_marker() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("installer.exe");
        make_zip_with_prefix(&path, b"#!/bin/sh\nself-extracting-stub\n");

        let registry = TempRegistry::new();
        let stripped = strip_self_extracting_header(&path, &registry).unwrap();
        let bytes = std::fs::read(&stripped).unwrap();
        assert_eq!(&bytes[0..2], ZIP_MAGIC);
    }

    #[test]
    fn missing_pk_marker_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not_an_archive.bin");
        std::fs::write(&path, b"no markers here").unwrap();

        let registry = TempRegistry::new();
        let err = strip_self_extracting_header(&path, &registry).unwrap_err();
        assert!(matches!(err, ResolveError::MissingSelfExtractingMarker { .. }));
    }

    #[test]
    fn discovers_spring_boot_and_war_roots_and_nested_libs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("outer.jar");
        let file = File::create(&path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        for name in ["BOOT-INF/classes/p/A.class", "BOOT-INF/lib/inner.jar", "WEB-INF/classes/q/B.class"] {
            writer.start_file(name, zip::write::SimpleFileOptions::default()).unwrap();
            writer.write_all(b"x").unwrap();
        }
        writer.finish().unwrap();

        let file = File::open(&path).unwrap();
        let mut archive = ZipArchive::new(file).unwrap();
        let roots = discover_package_roots(&mut archive, &ManifestInfo::default());
        assert_eq!(roots.spring_boot_classes_root.as_deref(), Some("BOOT-INF/classes/"));
        assert_eq!(roots.war_classes_root.as_deref(), Some("WEB-INF/classes/"));
        assert_eq!(roots.nested_lib_jars, vec!["BOOT-INF/lib/inner.jar".to_string()]);
    }
}
