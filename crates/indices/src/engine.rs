//! Annual index computation over a grid series.

use std::ops::Range;
use std::sync::Arc;

use climdex_grid::{AnnualIndexGrid, GridSeries};
use climdex_runs::run_lengths;
use climdex_thresholds::{PercentileThresholdTable, ThresholdCache, ThresholdConfig};
use ndarray::Array3;
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::catalog::{IndexCatalog, IndexCategory, IndexDefinition, SpellSpec};
use crate::error::IndexError;
use crate::reduction::Reduction;

/// Computes annual indices from daily grid series.
///
/// The engine holds the catalog, the threshold settings and the shared
/// [`ThresholdCache`]. It is `Sync`; one engine serves every worker of a
/// batch so that each baseline's thresholds are built once.
#[derive(Debug, Clone)]
pub struct IndexEngine {
    catalog: Arc<IndexCatalog>,
    threshold_config: ThresholdConfig,
    cache: Arc<ThresholdCache>,
}

impl IndexEngine {
    /// Creates an engine with default threshold settings and a fresh cache.
    pub fn new(catalog: Arc<IndexCatalog>) -> Self {
        Self {
            catalog,
            threshold_config: ThresholdConfig::default(),
            cache: Arc::new(ThresholdCache::new()),
        }
    }

    /// Sets the window and sample settings for spell thresholds.
    pub fn with_threshold_config(mut self, config: ThresholdConfig) -> Self {
        self.threshold_config = config;
        self
    }

    /// Shares an existing threshold cache.
    pub fn with_cache(mut self, cache: Arc<ThresholdCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn catalog(&self) -> &IndexCatalog {
        &self.catalog
    }

    pub fn threshold_config(&self) -> &ThresholdConfig {
        &self.threshold_config
    }

    pub fn cache(&self) -> &ThresholdCache {
        &self.cache
    }

    /// Computes each requested index from `series`.
    ///
    /// Returns one result per id, in request order. A failing index does
    /// not affect the others. `baseline` is only read by spell indices.
    #[tracing::instrument(
        skip_all,
        fields(
            model = series.model(),
            scenario = series.scenario(),
            variable = series.variable(),
            n_indices = index_ids.len(),
        )
    )]
    pub fn compute<S: AsRef<str>>(
        &self,
        series: &GridSeries,
        index_ids: &[S],
        baseline: Option<&GridSeries>,
    ) -> Vec<Result<AnnualIndexGrid, IndexError>> {
        let years = series.year_ranges();
        index_ids
            .iter()
            .map(|id| {
                let id: &str = id.as_ref();
                let result = self.compute_with_years(series, id, baseline, &years);
                if let Err(e) = &result {
                    warn!(index_id = id, error = %e, "index failed");
                }
                result
            })
            .collect()
    }

    /// Computes a single index. See [`IndexEngine::compute`].
    ///
    /// # Errors
    ///
    /// Returns [`IndexError`] for unknown ids, variable mismatches, missing
    /// or mismatched baselines, and threshold build failures.
    pub fn compute_one(
        &self,
        series: &GridSeries,
        index_id: &str,
        baseline: Option<&GridSeries>,
    ) -> Result<AnnualIndexGrid, IndexError> {
        self.compute_with_years(series, index_id, baseline, &series.year_ranges())
    }

    fn compute_with_years(
        &self,
        series: &GridSeries,
        index_id: &str,
        baseline: Option<&GridSeries>,
        years: &[(i32, Range<usize>)],
    ) -> Result<AnnualIndexGrid, IndexError> {
        let def = self.catalog.lookup(index_id)?;
        if series.variable() != def.variable() {
            return Err(IndexError::VariableMismatch {
                index_id: index_id.to_string(),
                expected: def.variable().to_string(),
                found: series.variable().to_string(),
            });
        }

        let values = match def.category() {
            IndexCategory::Annual(reduction) => annual_values(series, years, reduction),
            IndexCategory::Spell(spec) => {
                let baseline = baseline.ok_or_else(|| IndexError::MissingBaseline {
                    index_id: index_id.to_string(),
                })?;
                check_baseline(def, series, baseline)?;
                let table = self
                    .cache
                    .thresholds_for(baseline, spec.percentile, &self.threshold_config)
                    .map_err(|source| IndexError::Threshold {
                        index_id: index_id.to_string(),
                        source,
                    })?;
                spell_values(series, years, &table, spec)
            }
        };
        debug!(index_id, n_years = years.len(), "computed index");

        let grid = AnnualIndexGrid::new(
            index_id,
            series.model(),
            series.scenario(),
            years.iter().map(|(year, _)| *year).collect(),
            values,
            Arc::clone(series.coords()),
        )?;
        Ok(grid)
    }
}

fn check_baseline(
    def: &IndexDefinition,
    series: &GridSeries,
    baseline: &GridSeries,
) -> Result<(), IndexError> {
    let mismatch = |reason: String| IndexError::BaselineMismatch {
        index_id: def.id().to_string(),
        reason,
    };
    if baseline.variable() != series.variable() {
        return Err(mismatch(format!(
            "baseline variable '{}' differs from series variable '{}'",
            baseline.variable(),
            series.variable()
        )));
    }
    if baseline.shape() != series.shape() {
        return Err(mismatch(format!(
            "baseline grid {:?} differs from series grid {:?}",
            baseline.shape(),
            series.shape()
        )));
    }
    Ok(())
}

/// Runs `per_cell` over every cell in parallel and assembles `[year, row, col]`.
fn assemble<F>(rows: usize, cols: usize, n_years: usize, per_cell: F) -> Array3<f64>
where
    F: Fn(usize, usize) -> Vec<f64> + Sync,
{
    let cells: Vec<Vec<f64>> = (0..rows * cols)
        .into_par_iter()
        .map(|idx| per_cell(idx / cols, idx % cols))
        .collect();
    let mut values = Array3::<f64>::from_elem((n_years, rows, cols), f64::NAN);
    for (idx, cell) in cells.into_iter().enumerate() {
        let (row, col) = (idx / cols, idx % cols);
        for (y, v) in cell.into_iter().enumerate() {
            values[[y, row, col]] = v;
        }
    }
    values
}

fn annual_values(
    series: &GridSeries,
    years: &[(i32, Range<usize>)],
    reduction: &Reduction,
) -> Array3<f64> {
    let (rows, cols) = series.shape();
    assemble(rows, cols, years.len(), |row, col| {
        let mut daily = Vec::new();
        let mut valid = Vec::new();
        years
            .iter()
            .map(|(_, range)| {
                daily.clear();
                daily.extend(series.cell_range(row, col, range.clone()).iter().copied());
                reduction.apply_with(&daily, &mut valid)
            })
            .collect()
    })
}

fn spell_values(
    series: &GridSeries,
    years: &[(i32, Range<usize>)],
    table: &PercentileThresholdTable,
    spec: &SpellSpec,
) -> Array3<f64> {
    let (rows, cols) = series.shape();
    let times = series.times();
    assemble(rows, cols, years.len(), |row, col| {
        let thresholds = table.cell(row, col);
        let mut flags = Vec::new();
        years
            .iter()
            .map(|(_, range)| {
                let daily = series.cell_range(row, col, range.clone());
                if daily.iter().all(|v| v.is_nan()) {
                    return f64::NAN;
                }
                flags.clear();
                flags.extend(times[range.clone()].iter().zip(daily.iter()).map(|(t, &v)| {
                    spec.direction.exceeds(v, thresholds[t.doy().index()])
                }));
                run_lengths(&flags, spec.min_run) as f64
            })
            .collect()
    })
}
