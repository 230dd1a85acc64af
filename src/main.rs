//! Scorebook CLI entrypoint.
//!
//! Provides a thin wrapper over the `cli` module: expand `@file` argument
//! indirections, parse args, run the task sequence, and exit with an
//! appropriate status. For programmatic use, prefer the library API.

use clap::Parser;

mod cli;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let argv = cli::expand_arg_files(std::env::args())?;
    let args = cli::CliArgs::parse_from(argv);
    cli::run(args)
}
