//! Append-only registry of temp files/directories created during a scan
//! (spec.md §4.2 "Cleanup"): shutdown unlinks them in reverse insertion
//! order so enclosed files are removed before enclosing directories.

use std::path::PathBuf;

use parking_lot::Mutex;
use tracing::warn;

#[derive(Default)]
pub struct TempRegistry {
    entries: Mutex<Vec<PathBuf>>,
}

impl TempRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, path: PathBuf) {
        self.entries.lock().push(path);
    }

    /// Unlinks every registered path in reverse insertion order. Best-effort:
    /// a failed removal is logged and does not stop the sweep.
    pub fn cleanup(&self) {
        let mut entries = self.entries.lock();
        for path in entries.drain(..).rev() {
            let result = if path.is_dir() {
                std::fs::remove_dir_all(&path)
            } else {
                std::fs::remove_file(&path)
            };
            if let Err(err) = result {
                warn!(path = %path.display(), error = %err, "failed to remove temp path during cleanup");
            }
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.lock().len()
    }
}

impl Drop for TempRegistry {
    fn drop(&mut self) {
        self.cleanup();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cleanup_removes_in_reverse_order() {
        let dir = tempfile::tempdir().unwrap();
        let nested_dir = dir.path().join("a");
        std::fs::create_dir(&nested_dir).unwrap();
        let nested_file = nested_dir.join("b.txt");
        std::fs::write(&nested_file, b"x").unwrap();

        let registry = TempRegistry::new();
        registry.register(nested_dir.clone());
        registry.register(nested_file.clone());
        assert_eq!(registry.len(), 2);

        registry.cleanup();
        assert!(!nested_dir.exists());
        assert_eq!(registry.len(), 0);
    }
}
