//! Per-canonical-path archive handle recycling (spec.md §4.2 "Handle
//! recycling", §9 "Scoped resource acquisition").
//!
//! Handles are drawn from a per-path pool on acquire and returned on
//! release. At shutdown, the acquired and released counts must match, else
//! [`HandlePool::close`] reports a leak.

use std::collections::HashMap;
use std::fs::File;

use parking_lot::Mutex;
use zip::ZipArchive;

use crate::error::ResolveError;

struct PathPool {
    idle: Vec<ZipArchive<File>>,
    acquired: u64,
    released: u64,
}

/// Recycles [`ZipArchive`] handles, one pool per canonical archive path.
#[derive(Default)]
pub struct HandlePool {
    pools: Mutex<HashMap<String, PathPool>>,
}

/// An archive handle checked out of the pool; returns itself on drop via
/// [`HandlePool::release`] called explicitly by the owner (scoped-acquisition
/// pattern — the pool itself does not implement `Drop` recycling to keep
/// "acquire"/"release" symmetric and auditable).
pub struct Handle {
    pub archive: ZipArchive<File>,
    path: String,
}

impl HandlePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires a handle for `path`, opening a fresh one if the pool is
    /// empty.
    pub fn acquire(&self, path: &str) -> Result<Handle, ResolveError> {
        let mut pools = self.pools.lock();
        let pool = pools.entry(path.to_string()).or_insert_with(|| PathPool { idle: Vec::new(), acquired: 0, released: 0 });

        let archive = match pool.idle.pop() {
            Some(archive) => archive,
            None => {
                let file = File::open(path).map_err(|source| ResolveError::Io { path: path.to_string(), source })?;
                ZipArchive::new(file).map_err(|source| ResolveError::Archive { path: path.to_string(), source })?
            }
        };
        pool.acquired += 1;
        Ok(Handle { archive, path: path.to_string() })
    }

    pub fn release(&self, handle: Handle) {
        let mut pools = self.pools.lock();
        if let Some(pool) = pools.get_mut(&handle.path) {
            pool.released += 1;
            pool.idle.push(handle.archive);
        }
    }

    /// Verifies every path's acquired/released counts match, returning the
    /// first mismatch found.
    pub fn close(&self) -> Result<(), ResolveError> {
        let pools = self.pools.lock();
        for (path, pool) in pools.iter() {
            if pool.acquired != pool.released {
                return Err(ResolveError::HandleLeak {
                    path: path.clone(),
                    acquired: pool.acquired,
                    released: pool.released,
                });
            }
        }
        Ok(())
    }
}
