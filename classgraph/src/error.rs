//! Aggregated scan error (spec.md §7): every sub-crate's failure mode that
//! is fatal for the whole scan, plus the facade's own configuration check.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error(transparent)]
    Resolve(#[from] classgraph_resolver::ResolveError),

    #[error(transparent)]
    Graph(#[from] classgraph_graph::GraphError),

    #[error("scan was interrupted")]
    Interrupted,

    #[error("both override_classpath and override_classloaders were set")]
    ConfigurationConflict,
}

pub type Result<T> = std::result::Result<T, ScanError>;
