//! Point extraction and per-period statistics.

use climdex_grid::AnnualIndexGrid;
use climdex_stats::{drop_nan, mean};
use serde::Serialize;
use tracing::debug;

use crate::error::SummaryError;
use crate::location::{Location, nearest_cell};
use crate::period::Period;

/// Summary of one index at one location over one period.
///
/// `min`, `mean` and `max` are `None` when every year in the period is NaN.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub index_id: String,
    pub model: String,
    pub scenario: String,
    pub location: String,
    /// Grid cell used for the location.
    pub row: usize,
    pub col: usize,
    pub period: String,
    pub start: i32,
    pub end: i32,
    /// Years of the period present in the grid.
    pub n_years: usize,
    /// Years with a finite value.
    pub n_valid: usize,
    pub min: Option<f64>,
    pub mean: Option<f64>,
    pub max: Option<f64>,
}

/// Summarise every grid at every location over every period.
///
/// A period with no overlapping years in a grid produces no row, so the
/// `hist` scenario only reports historical periods.
pub fn summarize(
    grids: &[AnnualIndexGrid],
    locations: &[Location],
    periods: &[Period],
) -> Vec<SummaryRow> {
    let mut rows = Vec::new();
    for grid in grids {
        for location in locations {
            let Some((r, c)) = nearest_cell(grid.coords(), location) else {
                debug!(index = grid.index_id(), location = %location.name, "no cell for location");
                continue;
            };
            let series = grid.cell_series(r, c);
            for period in periods {
                let in_period: Vec<f64> = series
                    .iter()
                    .filter(|(year, _)| period.contains(*year))
                    .map(|&(_, v)| v)
                    .collect();
                if in_period.is_empty() {
                    continue;
                }
                let valid = drop_nan(&in_period);
                let (min, mean, max) = if valid.is_empty() {
                    (None, None, None)
                } else {
                    (
                        valid.iter().copied().reduce(f64::min),
                        Some(mean(&valid)),
                        valid.iter().copied().reduce(f64::max),
                    )
                };
                rows.push(SummaryRow {
                    index_id: grid.index_id().to_string(),
                    model: grid.model().to_string(),
                    scenario: grid.scenario().to_string(),
                    location: location.name.clone(),
                    row: r,
                    col: c,
                    period: period.label().to_string(),
                    start: period.start(),
                    end: period.end(),
                    n_years: in_period.len(),
                    n_valid: valid.len(),
                    min,
                    mean,
                    max,
                });
            }
        }
    }
    rows
}

/// Serialize summary rows to a pretty-printed JSON array.
pub fn to_json(rows: &[SummaryRow]) -> Result<String, SummaryError> {
    serde_json::to_string_pretty(rows).map_err(|e| SummaryError::Serialization {
        reason: e.to_string(),
    })
}
