//! Classfile decoding: turns one classfile's bytes into a [`decoded::DecodedClass`]
//! fact record (spec.md §4.1).

mod access_flags;
mod annotations;
mod class_file;
mod constant_pool;
mod decoded;
mod error;
mod field_types;
mod stream;

pub use access_flags::{ClassAccessFlags, FieldAccessFlags};
pub use class_file::{decode, CLASS_MAGIC, ROOT_CLASS_NAME};
pub use decoded::{ClassKind, ClassNameRegistry, DecodeOutcome, DecodedClass, InMemoryClassNameRegistry};
pub use error::{ClassFileError, Result};
pub use field_types::referenced_class_names;
