//! Dex errors definitions.

use std::num::ParseIntError;
use thiserror::Error;

/// An alias for result that can be a [`DexError`].
pub type DexResult<T> = Result<T, DexError>;

/// The Dex error type.
#[derive(Debug, Error)]
pub enum DexError {
    /// Error that can be returned at parsing.
    #[error("parsing error at {0:?} ({1:?})")]
    Parsing(String, nom::error::ErrorKind),

    /// Integer literal that does not fit its destination.
    #[error("invalid integer literal: {0}")]
    Integer(#[from] ParseIntError),

    #[error("could not convert {} into {}", from, to)]
    Conversion { from: String, to: String },

    #[error("invalid type")]
    InvalidType,

    #[error("Bad instruction(s) size")]
    BadInstructionSize,
}

impl nom::error::ParseError<&str> for DexError {
    fn from_error_kind(input: &str, kind: nom::error::ErrorKind) -> Self {
        Self::Parsing(input.to_string(), kind)
    }

    fn append(_: &str, _: nom::error::ErrorKind, other: Self) -> Self {
        other
    }
}

impl nom::error::FromExternalError<&str, ParseIntError> for DexError {
    fn from_external_error(_: &str, _: nom::error::ErrorKind, e: ParseIntError) -> Self {
        Self::Integer(e)
    }
}

impl nom::error::FromExternalError<&str, DexError> for DexError {
    fn from_external_error(_: &str, _: nom::error::ErrorKind, e: DexError) -> Self {
        e
    }
}
