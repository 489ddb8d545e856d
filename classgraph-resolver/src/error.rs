//! Resolver error type (spec.md §7: `ArchiveResolveFailure`, `RemoteFetchFailure`,
//! `Interrupted`, `InternalInvariantViolation`).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("I/O error resolving {path:?}: {source}")]
    Io { path: String, #[source] source: std::io::Error },

    #[error("failed to read archive {path:?}: {source}")]
    Archive { path: String, #[source] source: zip::result::ZipError },

    #[error("failed to download {url:?}: {message}")]
    RemoteFetch { url: String, message: String },

    #[error("entry {entry:?} not found in archive {path:?}")]
    EntryNotFound { path: String, entry: String },

    #[error("no PK marker found while stripping self-extracting header of {path:?}")]
    MissingSelfExtractingMarker { path: String },

    #[error("archive handle pool for {path:?} leaked: {acquired} acquired, {released} released")]
    HandleLeak { path: String, acquired: u64, released: u64 },

    #[error("cached build for {key:?} previously failed: {message}")]
    CachedBuildFailure { key: String, message: String },

    #[error("scan was interrupted")]
    Interrupted,
}

pub type Result<T> = std::result::Result<T, ResolveError>;
