//! Main `DroidWorks` symex binary command line arguments options.
//!
//! This module declares a function to build `clap` command line arguments
//! parser, so that it can be used from other places than the main binary,
//! such as from bash completion file generator.

use clap::{value_parser, Arg, ArgAction, Command};
use clap_complete::Shell;

const NAME: &str = "dw-symex";
const VERSION: &str = env!("CARGO_PKG_VERSION");
const AUTHORS: &str = env!("CARGO_PKG_AUTHORS");
const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

fn arg_debug() -> Arg {
    Arg::new("debug")
        .short('d')
        .long("debug")
        .action(ArgAction::SetTrue)
        .help("Activate debug mode")
}

fn arg_verbose() -> Arg {
    Arg::new("verbose")
        .short('v')
        .long("verbose")
        .action(ArgAction::SetTrue)
        .help("Activate verbose mode")
}

fn arg_ecslog() -> Arg {
    Arg::new("ecslog")
        .short('e')
        .long("ecslog")
        .action(ArgAction::SetTrue)
        .help("Output logs in ECS format")
}

#[must_use]
pub fn droidworks_symex() -> Command {
    Command::new(NAME)
        .version(VERSION)
        .author(AUTHORS)
        .about(DESCRIPTION)
        .subcommand(aput())
        .subcommand(
            Command::new("gen-completions")
                .about("Generates completions file")
                .arg(
                    Arg::new("shell")
                        .short('s')
                        .long("shell")
                        .action(ArgAction::Set)
                        .value_parser(value_parser!(Shell))
                        .required(true)
                        .help("Shell type for completion generation"),
                ),
        )
}

#[must_use]
pub fn aput() -> Command {
    Command::new("aput")
        .bin_name("dw-aput")
        .version(VERSION)
        .author(AUTHORS)
        .about("Symbolically executes an array store instruction")
        .after_help(
            "Example:\n $ dw-aput -I 'aput-byte v2, v0, v1' -r 'v0=array:[B:4' -r v1=int:1 -r v2=int:300\n\n\
             Register literals:\n \
             int:N, long:N, bool:true|false, byte:N, char:N, short:N, null,\n \
             array:<descriptor>:<length>, object:<descriptor>, unknown:<descriptor>,\n \
             vM (shares the value of a previously assigned register)",
        )
        .arg(arg_debug())
        .arg(arg_verbose())
        .arg(arg_ecslog())
        .arg(
            Arg::new("instr")
                .short('I')
                .long("instr")
                .action(ArgAction::Set)
                .required(true)
                .help("Instruction to execute, e.g. 'aput-char v0, v1, v2'"),
        )
        .arg(
            Arg::new("addr")
                .short('a')
                .long("addr")
                .action(ArgAction::Set)
                .value_parser(value_parser!(usize))
                .default_value("0")
                .help("Code unit offset of the instruction"),
        )
        .arg(
            Arg::new("register")
                .short('r')
                .long("reg")
                .action(ArgAction::Append)
                .help("Initial register value, as vN=<literal>"),
        )
        .arg(
            Arg::new("class")
                .short('c')
                .long("class")
                .action(ArgAction::Append)
                .help("Class hierarchy entry, as class:superclass[:interface...]"),
        )
}
