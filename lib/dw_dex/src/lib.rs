//! Dalvik bytecode vocabulary shared by the `DroidWorks` symbolic execution crates:
//! code addresses, registers, type descriptors and instruction descriptors.

mod addr;
mod parsers;

pub mod errors;
pub mod instrs;
pub mod registers;
pub mod types;

pub use crate::addr::Addr;
pub use crate::parsers::{parse_instr, parse_type, register, type_descriptor};
