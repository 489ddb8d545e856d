//! Signature parser error type (spec.md §4.4, REDESIGN FLAGS: "the parser
//! reports errors as values, not exceptions").

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("unexpected end of signature at position {0}")]
    UnexpectedEnd(usize),

    #[error("expected {expected:?} at position {pos}, found {found:?}")]
    UnexpectedChar { expected: char, found: char, pos: usize },

    #[error("unknown base type code {0:?}")]
    UnknownBaseType(char),

    #[error("trailing characters after signature at position {0}")]
    TrailingInput(usize),

    #[error("signature merge failed: {0}")]
    MergeMismatch(String),
}

pub type Result<T> = std::result::Result<T, SignatureError>;
