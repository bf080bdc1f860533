use clap::ArgMatches;
use clap_complete::{generate, Shell};
use droidworks_symex::prelude::*;
use droidworks_symex::{cli, dw_aput};
use std::io;

fn main() -> DwResult<()> {
    let args = cli::droidworks_symex().get_matches();

    match &args.subcommand() {
        Some(("aput", cmd_args)) => dw_aput::run(cmd_args),
        Some(("gen-completions", sub_args)) => subcommand_gen_completions(sub_args),
        Some((subcommand, _)) => Err(DwError::BadArguments(format!(
            "unknown subcommand '{subcommand}'"
        ))),
        None => Err(DwError::BadArguments("missing subcommand".to_string())),
    }
}

fn subcommand_gen_completions(sub_args: &ArgMatches) -> DwResult<()> {
    let generator = *sub_args
        .get_one::<Shell>("shell")
        .ok_or_else(|| DwError::BadArguments("--shell needed".to_string()))?;
    let mut cmd = cli::droidworks_symex();
    let cmd_name = cmd.get_name().to_string();
    generate(generator, &mut cmd, cmd_name, &mut io::stdout());
    Ok(())
}
