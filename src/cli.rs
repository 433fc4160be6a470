use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Annual climate extreme indices from gridded daily model output.
#[derive(Parser)]
#[command(
    name = "climdex",
    version,
    about = "Annual climate extreme indices from gridded daily model output"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Compute indices for every configured model, scenario and variable.
    Compute(ComputeArgs),
    /// List the registered indices.
    Catalog(CatalogArgs),
    /// Summarise an existing index table at the configured locations.
    Summarize(SummarizeArgs),
}

/// Arguments for the `compute` subcommand.
#[derive(clap::Args)]
pub struct ComputeArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "climdex.toml")]
    pub config: PathBuf,

    /// Override output Parquet path from config.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Number of worker threads (defaults to one per core).
    #[arg(short, long)]
    pub threads: Option<usize>,
}

/// Arguments for the `catalog` subcommand.
#[derive(clap::Args)]
pub struct CatalogArgs {
    /// Optional TOML configuration providing units and variable overrides.
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Arguments for the `summarize` subcommand.
#[derive(clap::Args)]
pub struct SummarizeArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "climdex.toml")]
    pub config: PathBuf,

    /// Index table written by `compute`.
    #[arg(short, long)]
    pub input: PathBuf,

    /// Path for the summary JSON.
    #[arg(short, long)]
    pub output: PathBuf,
}
