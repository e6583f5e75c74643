//! `fob-surface` binary entry point.

use clap::Parser;
use fob_surface_cli::{cli, commands, error, logger};
use miette::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    logger::init_logger(args.verbose, args.quiet, args.no_color);

    commands::run_execute(args)
        .await
        .map_err(error::cli_error_to_miette)
}
