//! Dalvik bytecode instruction descriptors.
//!
//! A descriptor carries what an interpreter needs to build an operation out of
//! a decoded instruction: its address, mnemonic, size in code units and
//! register operands.

use crate::registers::Reg;
use crate::Addr;
use serde::Serialize;
use std::fmt;

pub trait Instruction {
    fn mnemonic(&self) -> &str;
    fn size(&self) -> usize;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabeledInstr {
    pub(crate) addr: Addr,
    pub(crate) mnemonic: String,
    pub(crate) size: usize,
    pub(crate) regs: Vec<Reg>,
}

impl Instruction for LabeledInstr {
    #[inline]
    fn mnemonic(&self) -> &str {
        &self.mnemonic
    }

    #[inline]
    fn size(&self) -> usize {
        self.size
    }
}

impl fmt::Display for LabeledInstr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.mnemonic)?;
        for (i, r) in self.regs.iter().enumerate() {
            if i == 0 {
                write!(f, " {r}")?;
            } else {
                write!(f, ", {r}")?;
            }
        }
        Ok(())
    }
}

impl LabeledInstr {
    #[must_use]
    pub fn new<S: Into<String>>(addr: Addr, mnemonic: S, size: usize, regs: Vec<Reg>) -> Self {
        Self {
            addr,
            mnemonic: mnemonic.into(),
            size,
            regs,
        }
    }

    #[inline]
    #[must_use]
    pub const fn addr(&self) -> Addr {
        self.addr
    }

    /// Returns the register operands, in the order of the textual form.
    #[inline]
    #[must_use]
    pub fn regs(&self) -> &[Reg] {
        &self.regs
    }

    #[inline]
    #[must_use]
    pub const fn next_addr(&self) -> Addr {
        self.addr.advance(self.size)
    }
}
