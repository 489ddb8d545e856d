//! Graph-builder error type (spec.md §7: `InternalInvariantViolation`,
//! `Interrupted`).

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("class {name:?} has conflicting superclasses {first:?} and {second:?}")]
    ConflictingSuperclass { name: String, first: String, second: String },

    #[error("graph finalization was interrupted")]
    Interrupted,
}

pub type Result<T> = std::result::Result<T, GraphError>;
