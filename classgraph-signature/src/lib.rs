//! Parses JVM field/method/class type signatures into a tagged tree
//! (spec.md §4.4). Not used by the graph itself; a standalone utility for
//! downstream consumers that need generic-type detail.

mod ast;
mod cursor;
mod error;
mod merge;
mod parser;

pub use ast::{
    BaseType, ClassSignature, ClassTypeSignature, MethodSignature, ReferenceTypeSignature,
    SimpleClassTypeSignature, ThrowsSignature, TypeArgument, TypeParameter, TypeSignature,
};
pub use error::{Result, SignatureError};
pub use merge::{merge_parameter_lists, ACC_MANDATED, ACC_SYNTHETIC};
pub use parser::{parse_class_signature, parse_field_signature, parse_method_signature};
