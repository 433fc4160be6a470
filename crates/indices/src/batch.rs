//! Parallel batch execution with per-unit failure isolation.

use std::fmt;
use std::sync::Arc;

use climdex_grid::{AnnualIndexGrid, GridSeries};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

use crate::engine::IndexEngine;
use crate::error::IndexError;

/// One (model, scenario, variable) input and the indices to compute from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkUnit {
    pub model: String,
    pub scenario: String,
    pub variable: String,
    pub index_ids: Vec<String>,
}

impl fmt::Display for WorkUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.variable, self.model, self.scenario)
    }
}

/// Loads the series a [`WorkUnit`] needs.
///
/// Implementations are shared across worker threads.
pub trait SeriesSource: Sync {
    /// The unit's own series.
    fn load(&self, unit: &WorkUnit) -> Result<GridSeries, IndexError>;

    /// The baseline series for the unit's (model, variable).
    ///
    /// Only called for units that request a spell index.
    fn load_baseline(&self, unit: &WorkUnit) -> Result<Arc<GridSeries>, IndexError>;
}

/// A unit or index that produced no output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitFailure {
    pub model: String,
    pub scenario: String,
    pub variable: String,
    /// `None` when the whole unit failed (e.g. its input could not be read).
    pub index_id: Option<String>,
    pub reason: String,
}

impl UnitFailure {
    fn new(unit: &WorkUnit, index_id: Option<&str>, reason: String) -> Self {
        Self {
            model: unit.model.clone(),
            scenario: unit.scenario.clone(),
            variable: unit.variable.clone(),
            index_id: index_id.map(str::to_string),
            reason,
        }
    }
}

/// Outputs and failures of a batch, in unit order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub grids: Vec<AnnualIndexGrid>,
    pub failures: Vec<UnitFailure>,
}

impl BatchReport {
    /// `true` if nothing failed.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Renders an error and its source chain on one line.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut msg = err.to_string();
    let mut source = err.source();
    while let Some(s) = source {
        msg.push_str(": ");
        msg.push_str(&s.to_string());
        source = s.source();
    }
    msg
}

/// Computes every unit in parallel.
///
/// A unit whose series cannot be loaded yields one failure with no index
/// id; failing indices yield one failure each. Neither stops other units.
#[tracing::instrument(skip_all, fields(n_units = units.len()))]
pub fn run_batch<S: SeriesSource>(
    engine: &IndexEngine,
    units: &[WorkUnit],
    source: &S,
) -> BatchReport {
    let per_unit: Vec<BatchReport> = units
        .par_iter()
        .map(|unit| run_unit(engine, unit, source))
        .collect();

    let mut report = BatchReport::default();
    for unit_report in per_unit {
        report.grids.extend(unit_report.grids);
        report.failures.extend(unit_report.failures);
    }
    info!(
        n_grids = report.grids.len(),
        n_failures = report.failures.len(),
        threshold_builds = engine.cache().builds(),
        "batch finished"
    );
    report
}

fn run_unit<S: SeriesSource>(engine: &IndexEngine, unit: &WorkUnit, source: &S) -> BatchReport {
    let mut report = BatchReport::default();

    let series = match source.load(unit) {
        Ok(series) => series,
        Err(e) => {
            let reason = error_chain(&e);
            warn!(unit = %unit, error = %reason, "skipping unit");
            report.failures.push(UnitFailure::new(unit, None, reason));
            return report;
        }
    };

    let needs_baseline = unit.index_ids.iter().any(|id| {
        engine
            .catalog()
            .lookup(id)
            .is_ok_and(|def| def.needs_baseline())
    });
    let mut baseline_error = None;
    let baseline = if needs_baseline {
        match source.load_baseline(unit) {
            Ok(b) => Some(b),
            Err(e) => {
                baseline_error = Some(error_chain(&e));
                None
            }
        }
    } else {
        None
    };

    let results = engine.compute(&series, unit.index_ids.as_slice(), baseline.as_deref());
    for (id, result) in unit.index_ids.iter().zip(results) {
        match result {
            Ok(grid) => report.grids.push(grid),
            Err(e) => {
                let reason = match (&e, &baseline_error) {
                    (IndexError::MissingBaseline { .. }, Some(load)) => {
                        format!("{}: {load}", error_chain(&e))
                    }
                    _ => error_chain(&e),
                };
                report
                    .failures
                    .push(UnitFailure::new(unit, Some(id.as_str()), reason));
            }
        }
    }
    report
}
