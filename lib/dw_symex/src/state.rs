//! Register files consumed by transfer functions.

use crate::errors::{DecoderError, SymexError, SymexResult};
use crate::value::AbstractValue;
use dw_dex::registers::Reg;
use std::fmt;

/// The register contract of a method state.
///
/// A register file does not interpret values: `read` returns whatever was
/// last assigned.
pub trait RegisterFile {
    /// Returns the value of register `r`.
    ///
    /// # Errors
    ///
    /// Addressing a register outside of the frame is a precondition violation.
    fn read(&self, r: Reg) -> SymexResult<AbstractValue>;

    /// Overwrites the value of register `r`.
    ///
    /// # Errors
    ///
    /// Addressing a register outside of the frame is a precondition violation.
    fn assign(&mut self, r: Reg, value: AbstractValue) -> SymexResult<()>;
}

fn out_of_frame(r: Reg, size: usize) -> SymexError {
    DecoderError::PreconditionViolation(format!("register {r} outside of a {size} registers frame"))
        .into()
}

/// The symbolic state of the registers of a method frame.
///
/// Every register always holds a value: the state can only be built from
/// fully initialized registers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodState {
    registers: Vec<AbstractValue>,
}

impl fmt::Display for MethodState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, v) in self.registers.iter().enumerate() {
            writeln!(f, "    v{i}: {v}")?;
        }
        Ok(())
    }
}

impl From<Vec<AbstractValue>> for MethodState {
    fn from(registers: Vec<AbstractValue>) -> Self {
        Self { registers }
    }
}

impl MethodState {
    #[must_use]
    pub fn new(registers: Vec<AbstractValue>) -> Self {
        Self::from(registers)
    }

    /// Builds a frame of `size` registers, all unknown of the given descriptor.
    #[must_use]
    pub fn unknown(size: usize, descriptor: &str) -> Self {
        Self::from(vec![AbstractValue::unknown(descriptor); size])
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.registers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Reg, &AbstractValue)> {
        self.registers
            .iter()
            .enumerate()
            .filter_map(|(i, v)| u16::try_from(i).ok().map(|i| (Reg::from(i), v)))
    }
}

impl RegisterFile for MethodState {
    fn read(&self, r: Reg) -> SymexResult<AbstractValue> {
        self.registers
            .get(r.index())
            .cloned()
            .ok_or_else(|| out_of_frame(r, self.registers.len()))
    }

    fn assign(&mut self, r: Reg, value: AbstractValue) -> SymexResult<()> {
        let size = self.registers.len();
        self.registers
            .get_mut(r.index())
            .map(|slot| *slot = value)
            .ok_or_else(|| out_of_frame(r, size))
    }
}
