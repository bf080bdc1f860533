use droidworks_symex::prelude::DwResult;
use droidworks_symex::{cli, dw_aput};

fn main() -> DwResult<()> {
    let args = cli::aput().get_matches();
    dw_aput::run(&args)
}
