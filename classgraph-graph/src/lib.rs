//! Class-graph builder: accumulates `ClassInfo` records into a DAG and, after
//! `finalize`, answers structural queries (spec.md §4.3).

pub mod builder;
pub mod class_info;
pub mod error;
mod node;

pub use builder::Graph;
pub use class_info::{ClassInfo, ClassKind, Origin};
pub use error::{GraphError, Result};
