//! Global error handling.
//!
//! Each sub-crate of the project defines its own type error.
//! Their types are unified here, when winding results at the top-level.
//!
//! ```rust
//! use droidworks_symex::prelude::*;
//!
//! fn main() -> DwResult<()> { // can return a DwError
//!    let _typ = dw_dex::parse_type("[B")?; // can return a DexError
//!    Ok(())
//! }
//! ```

use dw_dex::errors::DexError;
use dw_symex::errors::SymexError;
use std::io;
use thiserror::Error;

/// An alias for result that can be a [`DwError`].
pub type DwResult<T> = Result<T, DwError>;

/// The main error type for error winding at the top-level.
/// It mainly consists of transparent wrapper over error types that
/// are defined in dependencies.
#[derive(Debug, Error)]
pub enum DwError {
    /// Custom error for reporting bad command line arguments usage.
    #[error("bad arguments: {0}")]
    BadArguments(String),

    /// Error that can be returned from [I/O operations](std::io).
    #[error(transparent)]
    IO(#[from] io::Error),

    /// Error that can be returned from [`dw_symex`] functions.
    #[error(transparent)]
    Symex(#[from] SymexError),

    /// Error that can be returned from [`dw_dex`] functions.
    #[error(transparent)]
    Dex(#[from] DexError),
}
