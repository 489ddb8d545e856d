//! Facade crate: wires the resolver, classfile decoder, and graph builder
//! into one `scan()` entry point (spec.md §1 "The core").

pub mod error;
pub mod result;
mod scan;
mod walker;

pub use error::{Result, ScanError};
pub use result::ScanResult;
pub use scan::scan;
