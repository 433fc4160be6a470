mod catalog_cmd;
mod cli;
mod compute_cmd;
mod config;
mod convert;
mod logging;
mod summarize_cmd;

use std::process;

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Command};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Compute(args) => compute_cmd::run(args),
        Command::Catalog(args) => catalog_cmd::run(args),
        Command::Summarize(args) => summarize_cmd::run(args),
    }
}
