//! Symbolic execution errors definitions.

use crate::coercion::Variant;
use dw_dex::errors::DexError;
use thiserror::Error;

/// An alias for result that can be a [`SymexError`].
pub type SymexResult<T> = Result<T, SymexError>;

/// The top-level error type of the symbolic executor.
#[derive(Debug, Error)]
pub enum SymexError {
    #[error("coercion error: {0}")]
    Coercion(#[from] CoercionError),

    #[error("execution error: {0}")]
    Execution(#[from] ExecutionError),

    #[error("decoder error: {0}")]
    Decoder(#[from] DecoderError),

    /// Error that can be returned when parsing textual Dalvik descriptors.
    #[error("dex error: {0}")]
    Dex(#[from] DexError),
}

/// Errors raised by the primitive coercion ladder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoercionError {
    /// The source value is outside of the domain accepted by the variant.
    #[error("{value} cannot be stored by the {variant} variant")]
    TypeMismatch { variant: Variant, value: String },
}

/// Conditions the Dalvik VM would raise while executing an instruction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    /// Models `ArrayIndexOutOfBoundsException`.
    #[error("index {index} out of bounds for length {length}")]
    IndexOutOfBounds { index: i32, length: usize },

    /// Models `ArrayStoreException`.
    #[error("{value} cannot be stored into {array}")]
    ArrayStoreMismatch { value: String, array: String },

    #[error("type mismatch: {0}")]
    TypeMismatch(String),
}

/// Broken assumptions on the decoded instruction stream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecoderError {
    #[error("precondition violation: {0}")]
    PreconditionViolation(String),
}
