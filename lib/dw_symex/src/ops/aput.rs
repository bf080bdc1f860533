//! Array store instructions: `aput`, `aput-wide`, `aput-object`, `aput-boolean`,
//! `aput-byte`, `aput-char` and `aput-short`.

use crate::coercion::{coerce, widen, Variant};
use crate::errors::{DecoderError, ExecutionError, SymexResult};
use crate::heap::ArrayHandle;
use crate::hierarchy::Hierarchy;
use crate::ops::Op;
use crate::state::RegisterFile;
use crate::value::AbstractValue;
use dw_dex::instrs::{Instruction, LabeledInstr};
use dw_dex::registers::Reg;
use dw_dex::Addr;
use std::fmt;

/// Stores the value register into the array register at the index register.
#[derive(Debug, Clone)]
pub struct APutOp {
    addr: Addr,
    name: String,
    variant: Variant,
    children: Vec<Addr>,
    value_register: Reg,
    array_register: Reg,
    index_register: Reg,
}

impl fmt::Display for APutOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} r{}, r{}, r{}",
            self.name,
            self.value_register.value(),
            self.array_register.value(),
            self.index_register.value()
        )
    }
}

impl APutOp {
    /// # Errors
    ///
    /// Fails if `name` is not an array store mnemonic.
    pub fn new(
        addr: Addr,
        name: &str,
        child: Addr,
        value_register: Reg,
        array_register: Reg,
        index_register: Reg,
    ) -> Result<Self, DecoderError> {
        Ok(Self {
            addr,
            name: name.to_string(),
            variant: Variant::from_mnemonic(name)?,
            children: vec![child],
            value_register,
            array_register,
            index_register,
        })
    }

    /// Builds the operation from a decoded `23x` instruction, whose operands are
    /// the value, array and index registers.
    ///
    /// # Errors
    ///
    /// Fails if the instruction is not an array store or does not have exactly
    /// three register operands.
    pub fn create(instr: &LabeledInstr) -> SymexResult<Self> {
        let &[value, array, index] = instr.regs() else {
            return Err(DecoderError::PreconditionViolation(format!(
                "{} expects 3 registers, got {}",
                instr.mnemonic(),
                instr.regs().len()
            ))
            .into());
        };
        Ok(Self::new(
            instr.addr(),
            instr.mnemonic(),
            instr.next_addr(),
            value,
            array,
            index,
        )?)
    }

    #[inline]
    #[must_use]
    pub const fn variant(&self) -> Variant {
        self.variant
    }

    fn store(
        &self,
        array: &ArrayHandle,
        value: &AbstractValue,
        index: &AbstractValue,
        hierarchy: &Hierarchy,
    ) -> SymexResult<()> {
        let value = coerce(self.variant, value)?;
        let index = widen(index).ok_or_else(|| {
            ExecutionError::TypeMismatch(format!("{self}: index {index} is not an int"))
        })?;
        log::trace!("{self}: {}[{index}] <- {value}", array.descriptor());
        array.store(index, value, hierarchy)?;
        Ok(())
    }
}

impl Op for APutOp {
    fn address(&self) -> Addr {
        self.addr
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn children(&self) -> &[Addr] {
        &self.children
    }

    fn execute(
        &self,
        registers: &mut dyn RegisterFile,
        hierarchy: &Hierarchy,
    ) -> SymexResult<Vec<Addr>> {
        let value = registers.read(self.value_register)?;
        let array = registers.read(self.array_register)?;
        let index = registers.read(self.index_register)?;

        // A single unknown element makes the whole array unknown.
        let array = match array {
            AbstractValue::Unknown(_) => {
                log::trace!("{self}: store into unknown array");
                array
            }
            AbstractValue::ArrayRef(handle) => {
                if value.is_unknown() || index.is_unknown() {
                    log::trace!("{self}: unknown operand, array becomes unknown");
                    AbstractValue::Unknown(handle.descriptor())
                } else {
                    self.store(&handle, &value, &index, hierarchy)?;
                    AbstractValue::ArrayRef(handle)
                }
            }
            other => {
                return Err(ExecutionError::TypeMismatch(format!(
                    "{self}: {} holds {other}, not an array",
                    self.array_register
                ))
                .into())
            }
        };

        // Let downstream analyses know the array was modified.
        registers.assign(self.array_register, array)?;

        Ok(self.children.clone())
    }
}
