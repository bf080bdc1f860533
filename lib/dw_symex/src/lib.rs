//! This crate provides the symbolic execution of Dalvik array store
//! instructions for the `DroidWorks` project.
//!
//! Registers hold [abstract values](value::AbstractValue): concrete primitives,
//! references to simulated heap objects, or unknown values of a static type.
//! An [operation](ops::Op) built from a decoded instruction transfers a
//! [register file](state::RegisterFile) from its pre-state to its post-state
//! and returns the addresses control may flow to.

pub mod coercion;
pub mod errors;
pub mod heap;
pub mod hierarchy;
pub mod ops;
pub mod state;
pub mod value;

use crate::errors::SymexResult;
use crate::hierarchy::Hierarchy;
use crate::state::RegisterFile;
use dw_dex::Addr;

/// Parses an instruction from its textual form and executes it at `addr`.
pub fn execute_text(
    addr: Addr,
    text: &str,
    registers: &mut dyn RegisterFile,
    hierarchy: &Hierarchy,
) -> SymexResult<Vec<Addr>> {
    let instr = dw_dex::parse_instr(addr, text)?;
    let op = ops::create(&instr)?;
    log::debug!("{:04}: {op}", op.address());
    op.execute(registers, hierarchy)
}
