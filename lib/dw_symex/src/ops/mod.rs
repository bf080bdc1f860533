//! Symbolic operations built from decoded instructions.

mod aput;

pub use crate::ops::aput::APutOp;

use crate::errors::{DecoderError, SymexResult};
use crate::hierarchy::Hierarchy;
use crate::state::RegisterFile;
use dw_dex::instrs::{Instruction, LabeledInstr};
use dw_dex::Addr;
use std::fmt;

/// A transfer function over the registers of a method state.
pub trait Op: fmt::Display {
    /// Address of the instruction this operation was built from.
    fn address(&self) -> Addr;

    /// Opcode mnemonic.
    fn name(&self) -> &str;

    /// Addresses to which control may flow after this operation.
    fn children(&self) -> &[Addr];

    /// Applies the operation onto `registers` and returns the successor addresses.
    ///
    /// # Errors
    ///
    /// Returns conditions the VM would raise (bad coercion, bad index, bad store)
    /// and broken decoder preconditions. On error, `registers` is left untouched.
    fn execute(
        &self,
        registers: &mut dyn RegisterFile,
        hierarchy: &Hierarchy,
    ) -> SymexResult<Vec<Addr>>;
}

/// Builds the operation corresponding to a decoded instruction.
pub fn create(instr: &LabeledInstr) -> SymexResult<Box<dyn Op>> {
    match instr.mnemonic() {
        m if m == "aput" || m.starts_with("aput-") => Ok(Box::new(APutOp::create(instr)?)),
        m => Err(DecoderError::PreconditionViolation(format!("unsupported opcode {m}")).into()),
    }
}
