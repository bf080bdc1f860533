//! # `DroidWorks` symex
//!
//! `droidworks_symex` is the entry point of the symbolic execution tools of the
//! `DroidWorks` project. It reexports important structs and functions from the
//! sub-crates, mostly within the `droidworks_symex::prelude` namespace.
//!
//! ## Library basics
//!
//! A method state is a register file of abstract values. Operations are built
//! from instruction descriptors and executed onto it:
//!
//! ```rust
//! use droidworks_symex::prelude::*;
//!
//! let bytes = ArrayHandle::allocate(dw_dex::parse_type("[B")?, 8)?;
//! let mut state = MethodState::new(vec![
//!     AbstractValue::ArrayRef(bytes.clone()),
//!     AbstractValue::Int32(2),
//!     AbstractValue::Int32(300),
//! ]);
//! let instr = dw_dex::parse_instr(Addr::entry(), "aput-byte v2, v0, v1")?;
//! let next = ops::create(&instr)?.execute(&mut state, &Hierarchy::new())?;
//! assert_eq!(next, vec![Addr(2)]);
//! assert_eq!(bytes.get(2), Some(AbstractValue::Byte(44)));
//! # Ok::<(), DwError>(())
//! ```
//!
//! ## Sub-crates
//!
//!  - [`dw_dex`] contains the Dalvik vocabulary: addresses, registers, type
//!    descriptors and instruction descriptors,
//!  - [`dw_symex`] contains the abstract domain, the coercion rules and the
//!    transfer functions.

mod errors;

pub mod cli;
pub mod dw_aput;

pub use dw_dex as dex;
pub use dw_symex as symex;

/// Reexport module of commonly used structures and functions from `DroidWorks` project
/// sub-crates:
///
/// ```rust
/// use droidworks_symex::prelude::*;
/// ```
pub mod prelude {
    pub use crate::errors::{DwError, DwResult};

    pub use dw_dex::{Addr, registers::Reg, types::Type};

    pub use dw_symex::coercion::{coerce, Variant};
    pub use dw_symex::heap::{ArrayHandle, ObjectHandle};
    pub use dw_symex::hierarchy::Hierarchy;
    pub use dw_symex::ops::{self, APutOp, Op};
    pub use dw_symex::state::{MethodState, RegisterFile};
    pub use dw_symex::value::AbstractValue;

    use clap::ArgMatches;

    pub fn init_logger(args: &ArgMatches) {
        let env = env_logger::Env::new()
            .filter_or("DW_LOG", "info")
            .write_style("DW_LOG_STYLE");

        let mut builder = env_logger::Builder::from_env(env);
        if args.get_flag("verbose") {
            builder.filter_level(log::LevelFilter::Trace);
        } else if args.get_flag("debug") {
            builder.filter_level(log::LevelFilter::Debug);
        }
        if args.get_flag("ecslog") {
            builder.format(ecs_logger::format);
        }
        builder.init();
    }
}
