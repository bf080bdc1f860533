//! Types definitions to address Dalvik registers.
//!
//! In Dalvik bytecode, registers (or register pairs) are addressed either on 8 or 16 bits.
//! To ease the bytecode manipulation, we define a [register](Reg) wrapper over an 16 bits integer.
//! This also allows to differentiate registers from constant values in instruction operands.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The register type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Reg(u16);

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

impl From<u8> for Reg {
    fn from(r: u8) -> Self {
        Self(u16::from(r))
    }
}

impl From<u16> for Reg {
    fn from(r: u16) -> Self {
        Self(r)
    }
}

impl From<Reg> for u16 {
    fn from(r: Reg) -> Self {
        r.0
    }
}

impl Reg {
    /// Returns the wrapped register slot number.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u16 {
        self.0
    }

    /// Returns the register slot number as a vector index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_conversions() {
        assert_eq!(u16::from(Reg::from(300u16)), 300);
        assert_eq!(Reg::from(7u8).index(), 7);
        assert!(Reg::from(1u8) < Reg::from(2u16));
    }

    #[test]
    fn register_display() {
        assert_eq!(format!("{}", Reg::from(12u8)), "v12");
        assert_eq!(Reg::from(12u8).value(), 12);
    }
}
