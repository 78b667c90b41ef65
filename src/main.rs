//! droidbuild CLI entry point

use clap::Parser;

use droidbuild::cli::Cli;
use droidbuild::error::BuildError;

fn main() {
    let cli = Cli::parse();
    if let Err(err) = cli.execute() {
        // Tool failures get the full invocation context, including the
        // failing tool's captured stderr, echoed verbatim
        match err.downcast_ref::<BuildError>() {
            Some(build_err) => build_err.display_with_context(),
            None => eprintln!("error: {err:#}"),
        }
        std::process::exit(1);
    }
}
