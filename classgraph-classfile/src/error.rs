//! Decoder error type (spec.md §7, `RejectedClassfile`).

use thiserror::Error;

/// An error which causes the whole classfile to be rejected (spec.md §4.1
/// "Error conditions"). The scan continues past a rejected file; only the
/// one file is lost.
#[derive(Debug, Error)]
pub enum ClassFileError {
    #[error("I/O error reading class file: {0}")]
    Io(#[from] std::io::Error),

    #[error("bad magic number: {0:#010x}")]
    BadMagicNumber(u32),

    #[error("unknown constant pool tag: {0}")]
    UnknownConstantPoolTag(u8),

    #[error("invalid UTF-8 in constant pool entry")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    #[error("unknown method handle reference kind: {0}")]
    UnknownReferenceKind(u8),

    #[error("bad class access flags: {0:#06x}")]
    BadClassAccessFlags(u16),

    #[error("bad field access flags: {0:#06x}")]
    BadFieldAccessFlags(u16),

    #[error("constant pool index {0} out of range")]
    ConstantPoolIndexOutOfRange(u16),

    #[error("constant pool entry {0} has unexpected kind, expected {1}")]
    ConstantPoolEntryWrongKind(u16, &'static str),

    #[error("unknown element-value tag: {0:?}")]
    UnknownElementValueTag(char),

    #[error("class name {fqn:?} does not match archive-relative path {path:?}")]
    NameDoesNotMatchPath { fqn: String, path: String },
}

pub type Result<T> = std::result::Result<T, ClassFileError>;
