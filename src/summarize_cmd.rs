//! Summarize command: point summaries of an existing index table.

use anyhow::{Context, Result};
use tracing::{info, info_span};

use climdex_io::read_indices_parquet;
use climdex_summary::{summarize, to_json};

use crate::cli::SummarizeArgs;
use crate::compute_cmd::summary_periods;
use crate::config;
use crate::convert;

pub fn run(args: SummarizeArgs) -> Result<()> {
    let _cmd = info_span!("summarize").entered();
    let config = config::load(&args.config)?;

    let grids = read_indices_parquet(&args.input)
        .with_context(|| format!("failed to read Parquet: {}", args.input.display()))?;
    info!(n_grids = grids.len(), "index table loaded");

    let locations = convert::build_locations(&config.summary)?;
    let periods = summary_periods(&config, &grids)?;
    let rows = summarize(&grids, &locations, &periods);

    std::fs::write(&args.output, to_json(&rows)?)
        .with_context(|| format!("failed to write summary: {}", args.output.display()))?;
    info!(path = %args.output.display(), n_rows = rows.len(), "summary written");
    Ok(())
}
