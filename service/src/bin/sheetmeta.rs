//! `sheetmeta` command-line interface

use clap::Parser;
use sheetmeta_service::cli::{Cli, init_logging, run};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);
    run(&cli)
}
