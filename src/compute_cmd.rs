//! Compute command: read every configured series, compute its indices and
//! write the index table, failure manifest and optional point summary.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info, info_span, warn};

use climdex_grid::{AnnualIndexGrid, GridCoords, GridSeries};
use climdex_indices::{
    BatchReport, IndexEngine, IndexError, SeriesSource, UnitFailure, WorkUnit, run_batch,
};
use climdex_io::{IoError, ReaderConfig, read_grid_series, write_indices_parquet};
use climdex_summary::{Period, decades_covering, summarize};

use crate::cli::ComputeArgs;
use crate::config::{self, ClimdexConfig};
use crate::convert;

type BaselineSlot = Arc<OnceLock<Result<Arc<GridSeries>, Arc<IoError>>>>;

/// Loads series from NetCDF files named by the input template.
///
/// Baselines are read at most once per (model, variable) and all series are
/// pointed at the first coordinate grid read.
pub struct FileSource {
    dir: PathBuf,
    template: String,
    baseline_scenario: String,
    reader: ReaderConfig,
    baselines: Mutex<HashMap<(String, String), BaselineSlot>>,
    coords: Mutex<Option<Arc<GridCoords>>>,
}

impl FileSource {
    pub fn new(
        dir: impl Into<PathBuf>,
        template: impl Into<String>,
        baseline_scenario: impl Into<String>,
        reader: ReaderConfig,
    ) -> Self {
        Self {
            dir: dir.into(),
            template: template.into(),
            baseline_scenario: baseline_scenario.into(),
            reader,
            baselines: Mutex::new(HashMap::new()),
            coords: Mutex::new(None),
        }
    }

    /// Path of the file for one (variable, model, scenario).
    pub fn path_for(&self, variable: &str, model: &str, scenario: &str) -> PathBuf {
        self.dir
            .join(convert::render_template(&self.template, variable, model, scenario))
    }

    fn read(&self, variable: &str, model: &str, scenario: &str) -> Result<GridSeries, IoError> {
        let path = self.path_for(variable, model, scenario);
        let series = read_grid_series(&path, variable, model, scenario, &self.reader)?;
        Ok(self.share_coords(series))
    }

    fn share_coords(&self, series: GridSeries) -> GridSeries {
        let mut shared = self.coords.lock().unwrap_or_else(PoisonError::into_inner);
        match shared.as_ref() {
            Some(coords) => series.with_shared_coords(coords),
            None => {
                *shared = Some(Arc::clone(series.coords()));
                series
            }
        }
    }

    /// Number of distinct baselines requested so far.
    pub fn baselines_loaded(&self) -> usize {
        self.baselines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

fn source_error(what: String, err: impl std::error::Error + Send + Sync + 'static) -> IndexError {
    IndexError::Source {
        what,
        source: Box::new(err),
    }
}

impl SeriesSource for FileSource {
    fn load(&self, unit: &WorkUnit) -> Result<GridSeries, IndexError> {
        self.read(&unit.variable, &unit.model, &unit.scenario)
            .map_err(|e| source_error(unit.to_string(), e))
    }

    fn load_baseline(&self, unit: &WorkUnit) -> Result<Arc<GridSeries>, IndexError> {
        let key = (unit.model.clone(), unit.variable.clone());
        let slot = {
            let mut map = self.baselines.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(map.entry(key).or_default())
        };

        let result = slot.get_or_init(|| {
            debug!(model = %unit.model, variable = %unit.variable, "loading baseline");
            self.read(&unit.variable, &unit.model, &self.baseline_scenario)
                .map(Arc::new)
                .map_err(Arc::new)
        });

        let what = format!(
            "baseline {} {} {}",
            unit.variable, unit.model, self.baseline_scenario
        );
        match result {
            Ok(series) => Ok(Arc::clone(series)),
            Err(e) => Err(source_error(what, SharedIoError(Arc::clone(e)))),
        }
    }
}

/// A cached load error handed to every unit that shares the baseline.
#[derive(Debug)]
struct SharedIoError(Arc<IoError>);

impl std::fmt::Display for SharedIoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for SharedIoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(self.0.as_ref())
    }
}

/// Run summary written next to the index table.
#[derive(Debug, Serialize)]
pub struct Manifest {
    pub n_units: usize,
    pub n_grids: usize,
    pub n_rows: usize,
    pub threshold_builds: usize,
    pub output: PathBuf,
    pub failures: Vec<UnitFailure>,
}

/// Run the compute pipeline.
pub fn run(args: ComputeArgs) -> Result<()> {
    let _cmd = info_span!("compute").entered();
    let config = config::load(&args.config)?;
    let output = args.output.unwrap_or_else(|| config.output.parquet.clone());

    let report = match args.threads {
        Some(n) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .context("failed to build thread pool")?;
            pool.install(|| compute(&config))?
        }
        None => compute(&config)?,
    };

    write_outputs(&config, &output, report)
}

/// Builds the engine and source from `config` and runs every work unit.
pub fn compute(config: &ClimdexConfig) -> Result<(usize, usize, BatchReport)> {
    let reader = convert::build_reader_config(&config.input)?;
    let catalog = Arc::new(convert::build_catalog(&config.units, &config.run)?);
    let engine = IndexEngine::new(catalog)
        .with_threshold_config(convert::build_threshold_config(&config.thresholds)?);

    let units = convert::build_work_units(&config.run);
    info!(
        n_units = units.len(),
        input_dir = %config.input.dir.display(),
        "starting batch"
    );

    let source = FileSource::new(
        &config.input.dir,
        &config.input.template,
        &config.run.baseline_scenario,
        reader,
    );
    let report = run_batch(&engine, &units, &source);
    debug!(baselines = source.baselines_loaded(), "baselines requested");

    Ok((units.len(), engine.cache().builds(), report))
}

fn write_outputs(
    config: &ClimdexConfig,
    output: &Path,
    (n_units, threshold_builds, report): (usize, usize, BatchReport),
) -> Result<()> {
    let writer = convert::build_writer_config(&config.output)?;
    let n_rows = write_indices_parquet(output, &report.grids, &writer)
        .with_context(|| format!("failed to write Parquet: {}", output.display()))?;
    info!(path = %output.display(), n_rows, "index table written");

    if let Some(summary_path) = &config.output.summary {
        let locations = convert::build_locations(&config.summary)?;
        let periods = summary_periods(config, &report.grids)?;
        let rows = summarize(&report.grids, &locations, &periods);
        let json = climdex_summary::to_json(&rows)?;
        std::fs::write(summary_path, json)
            .with_context(|| format!("failed to write summary: {}", summary_path.display()))?;
        info!(path = %summary_path.display(), n_rows = rows.len(), "summary written");
    }

    if !report.is_complete() {
        warn!(
            n_failures = report.failures.len(),
            manifest = %config.output.manifest.display(),
            "some units failed"
        );
    }
    let manifest = Manifest {
        n_units,
        n_grids: report.grids.len(),
        n_rows,
        threshold_builds,
        output: output.to_path_buf(),
        failures: report.failures,
    };
    let json = serde_json::to_string_pretty(&manifest).context("failed to serialise manifest")?;
    std::fs::write(&config.output.manifest, json).with_context(|| {
        format!(
            "failed to write manifest: {}",
            config.output.manifest.display()
        )
    })?;

    Ok(())
}

/// Configured eras followed, if enabled, by every decade in the output.
pub fn summary_periods(config: &ClimdexConfig, grids: &[AnnualIndexGrid]) -> Result<Vec<Period>> {
    let mut periods = convert::build_eras(&config.summary)?;
    if config.summary.decades {
        let years: Vec<i32> = grids
            .iter()
            .flat_map(|g| g.years().iter().copied())
            .collect();
        periods.extend(decades_covering(&years));
    }
    Ok(periods)
}
