//! Orchestrates path normalization, remote fetch, self-extracting-header
//! stripping, nested-archive extraction, and manifest/package-root
//! discovery into one entry point: [`Resolver::resolve`] (spec.md §4.2).

use std::fs::File;
use std::path::{Path, PathBuf};

use classgraph_scanspec::{InterruptFlag, ScanSpec};
use zip::ZipArchive;

use crate::archive::{self, PackageRoots};
use crate::error::ResolveError;
use crate::handle_pool::HandlePool;
use crate::manifest::{self, ManifestInfo};
use crate::path::ClasspathPath;
use crate::remote;
use crate::singleton::SingletonMap;
use crate::temp_registry::TempRegistry;

/// What a classpath-element path resolves to: a physical, readable root
/// plus whatever the resolver learned along the way.
#[derive(Debug, Clone)]
pub struct ResolvedElement {
    /// The on-disk directory or archive file backing this element.
    pub physical_path: PathBuf,
    /// The package root within `physical_path` classfiles resolve relative
    /// to — `None` means the archive/directory root itself.
    pub package_root: Option<String>,
    pub is_system: bool,
    /// Further classpath-element path strings discovered via this element's
    /// manifest (`Class-Path`) or nested lib directories, to be fed back
    /// into [`Resolver::resolve`].
    pub additional_classpath: Vec<String>,
}

#[derive(Clone)]
struct ArchiveMetadata {
    manifest: ManifestInfo,
    roots: PackageRoots,
}

pub struct Resolver {
    temp_registry: TempRegistry,
    handle_pool: HandlePool,
    metadata_cache: SingletonMap<ArchiveMetadata>,
    extraction_cache: SingletonMap<PathBuf>,
    strip_self_extracting_archive_header: bool,
}

impl Resolver {
    pub fn new(scan_spec: &ScanSpec) -> Self {
        Self {
            temp_registry: TempRegistry::new(),
            handle_pool: HandlePool::new(),
            metadata_cache: SingletonMap::new(),
            extraction_cache: SingletonMap::new(),
            strip_self_extracting_archive_header: scan_spec.strip_self_extracting_archive_header,
        }
    }

    /// Resolves one raw classpath-element path string to a [`ResolvedElement`].
    pub fn resolve(&self, raw_path: &str, interrupt: &InterruptFlag) -> Result<ResolvedElement, ResolveError> {
        let parsed = ClasspathPath::parse(raw_path);

        let mut physical = if parsed.is_remote() {
            remote::fetch_to_temp_file(&parsed.outer, &self.temp_registry)?
        } else {
            PathBuf::from(&parsed.outer)
        };

        if physical.is_file() {
            if let Ok(canonical) = physical.canonicalize() {
                physical = canonical;
            }
        }

        if self.strip_self_extracting_archive_header && physical.is_file() {
            let key = format!("strip:{}", physical.display());
            physical = self.extraction_cache.get_or_build(&key, interrupt, || {
                archive::strip_self_extracting_header(&physical, &self.temp_registry).map_err(|e| e.to_string())
            })?;
        }

        self.walk_chain(physical, &parsed.inner, interrupt)
    }

    /// Shuts the resolver down: verifies no archive handle leaked, then
    /// unlinks every temp file/directory created during the scan.
    pub fn close(&self) -> Result<(), ResolveError> {
        self.handle_pool.close()?;
        self.temp_registry.cleanup();
        Ok(())
    }

    fn walk_chain(
        &self,
        mut current: PathBuf,
        segments: &[String],
        interrupt: &InterruptFlag,
    ) -> Result<ResolvedElement, ResolveError> {
        if current.is_dir() {
            return Ok(ResolvedElement {
                physical_path: current,
                package_root: None,
                is_system: false,
                additional_classpath: Vec::new(),
            });
        }

        let mut package_root = None;
        for (index, segment) in segments.iter().enumerate() {
            let is_last = index == segments.len() - 1;
            let current_str = current.to_str().unwrap_or_default().to_string();

            let entry_is_dir = {
                let mut handle = self.handle_pool.acquire(&current_str)?;
                let is_dir = entry_is_directory(&mut handle.archive, segment);
                self.handle_pool.release(handle);
                is_dir
            };

            if entry_is_dir {
                package_root = Some(segment.clone());
                if is_last {
                    break;
                }
                continue;
            }

            let extraction_key = format!("{current_str}!{segment}");
            let archive_path_for_build = current.clone();
            let segment_for_build = segment.clone();
            current = self.extraction_cache.get_or_build(&extraction_key, interrupt, || {
                let mut handle = self
                    .handle_pool
                    .acquire(archive_path_for_build.to_str().unwrap_or_default())
                    .map_err(|e| e.to_string())?;
                let result = archive::extract_entry_to_temp_file(
                    &mut handle.archive,
                    &segment_for_build,
                    archive_path_for_build.to_str().unwrap_or_default(),
                    &self.temp_registry,
                )
                .map_err(|e| e.to_string());
                self.handle_pool.release(handle);
                result
            })?;
            package_root = None;
        }

        // A terminal segment may name a single extracted file (e.g. one
        // `.class` entry) rather than a nested archive — that has no
        // manifest or package roots of its own, just stop here.
        let metadata = match self.archive_metadata(&current, interrupt) {
            Ok(metadata) => Some(metadata),
            Err(_) => None,
        };

        let mut additional_classpath = Vec::new();
        let mut is_system = false;
        let mut derived_root = None;

        if let Some(metadata) = &metadata {
            if let Some(parent) = current.parent() {
                for entry in &metadata.manifest.class_path {
                    additional_classpath.push(parent.join(entry).to_string_lossy().into_owned());
                }
            }
            let current_str = current.to_str().unwrap_or_default();
            for jar in &metadata.roots.nested_lib_jars {
                additional_classpath.push(format!("{current_str}!{jar}"));
            }
            is_system = metadata.manifest.is_system_jar;
            derived_root = metadata.roots.spring_boot_classes_root.clone().or(metadata.roots.war_classes_root.clone());
        }

        Ok(ResolvedElement {
            physical_path: current,
            package_root: package_root.or(derived_root),
            is_system,
            additional_classpath,
        })
    }

    fn archive_metadata(&self, path: &Path, interrupt: &InterruptFlag) -> Result<ArchiveMetadata, ResolveError> {
        let key = format!("metadata:{}", path.display());
        let path_owned = path.to_path_buf();
        self.metadata_cache.get_or_build(&key, interrupt, move || {
            let file = File::open(&path_owned).map_err(|e| e.to_string())?;
            let mut archive = ZipArchive::new(file).map_err(|e| e.to_string())?;

            let manifest = match archive.by_name("META-INF/MANIFEST.MF") {
                Ok(mut entry) => {
                    let mut content = String::new();
                    std::io::Read::read_to_string(&mut entry, &mut content).map_err(|e| e.to_string())?;
                    manifest::parse(&content)
                }
                Err(_) => ManifestInfo::default(),
            };

            let roots = archive::discover_package_roots(&mut archive, &manifest);
            Ok(ArchiveMetadata { manifest, roots })
        })
    }
}

fn entry_is_directory(archive: &mut ZipArchive<File>, name: &str) -> bool {
    match archive.by_name(name) {
        Ok(entry) => entry.is_dir(),
        Err(_) => name.ends_with('/'),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use classgraph_scanspec::ScanSpec;
    use std::io::Write;

    fn spec() -> ScanSpec {
        ScanSpec::builder().build()
    }

    #[test]
    fn resolves_plain_directory() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = Resolver::new(&spec());
        let interrupt = InterruptFlag::new();
        let resolved = resolver.resolve(dir.path().to_str().unwrap(), &interrupt).unwrap();
        assert_eq!(resolved.physical_path, dir.path());
        assert!(resolved.package_root.is_none());
    }

    #[test]
    fn resolves_entry_inside_a_jar() {
        let dir = tempfile::tempdir().unwrap();
        let jar_path = dir.path().join("outer.jar");
        let file = File::create(&jar_path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        writer.start_file("p/C.class", zip::write::SimpleFileOptions::default()).unwrap();
        writer.write_all(b"classbytes").unwrap();
        writer.finish().unwrap();

        let resolver = Resolver::new(&spec());
        let interrupt = InterruptFlag::new();
        let path = format!("{}!p/C.class", jar_path.display());
        let resolved = resolver.resolve(&path, &interrupt).unwrap();
        let bytes = std::fs::read(&resolved.physical_path).unwrap();
        assert_eq!(bytes, b"classbytes");
        resolver.close().unwrap();
    }
}
