//! Code address representation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An instruction address, counted in 16-bit code units from the method entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Addr(pub usize);

impl Addr {
    #[inline]
    #[must_use]
    pub const fn entry() -> Self {
        Self(0)
    }
}

impl fmt::Display for Addr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Addr {
    /// Returns the address located `code_units` after this one.
    #[inline]
    #[must_use]
    pub const fn advance(self, code_units: usize) -> Self {
        Self(self.0 + code_units)
    }
}
