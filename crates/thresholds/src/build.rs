//! Threshold construction from a baseline series.

use climdex_calendar::{DAYS_PER_YEAR, Doy, doy_window};
use climdex_grid::GridSeries;
use climdex_stats::{quantile_type7, sort_ascending};
use ndarray::Array3;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::config::ThresholdConfig;
use crate::error::ThresholdError;
use crate::table::PercentileThresholdTable;

/// Builds per-calendar-day thresholds at `percentile` from `baseline`.
///
/// For every day-of-year `d` and cell, the finite baseline values whose
/// day-of-year lies within `±half_window` of `d` (wrapping across the year
/// end) are pooled over all baseline years. 29 February pools with
/// 28 February. Fewer than `min_samples` pooled values gives NaN.
///
/// Cells are processed in parallel.
///
/// # Errors
///
/// Returns [`ThresholdError`] if `percentile` is outside `(0, 100)`, the
/// configuration is invalid, or the baseline has no time steps.
#[tracing::instrument(
    skip_all,
    fields(
        model = baseline.model(),
        variable = baseline.variable(),
        percentile = percentile,
    )
)]
pub fn build_thresholds(
    baseline: &GridSeries,
    percentile: f64,
    config: &ThresholdConfig,
) -> Result<PercentileThresholdTable, ThresholdError> {
    if !(percentile > 0.0 && percentile < 100.0) {
        return Err(ThresholdError::InvalidPercentile { percentile });
    }
    config.validate()?;
    if baseline.n_times() == 0 {
        return Err(ThresholdError::EmptyBaseline {
            variable: baseline.variable().to_string(),
            model: baseline.model().to_string(),
            scenario: baseline.scenario().to_string(),
        });
    }

    let slots: Vec<usize> = baseline.times().iter().map(|t| t.doy().index()).collect();
    let windows: Vec<Vec<usize>> = Doy::all()
        .map(|d| {
            doy_window(d, config.half_window())
                .into_iter()
                .map(Doy::index)
                .collect()
        })
        .collect();
    let p = percentile / 100.0;
    let (rows, cols) = baseline.shape();

    let per_cell: Vec<(Vec<f64>, usize)> = (0..rows * cols)
        .into_par_iter()
        .map(|idx| {
            let (row, col) = (idx / cols, idx % cols);
            cell_thresholds(baseline, row, col, &slots, &windows, p, config.min_samples())
        })
        .collect();

    let mut values = Array3::<f64>::from_elem((DAYS_PER_YEAR, rows, cols), f64::NAN);
    let mut n_insufficient = 0;
    for (idx, (thresholds, missing)) in per_cell.into_iter().enumerate() {
        let (row, col) = (idx / cols, idx % cols);
        for (d, t) in thresholds.into_iter().enumerate() {
            values[[d, row, col]] = t;
        }
        n_insufficient += missing;
    }

    if n_insufficient > 0 {
        debug!(n_insufficient, "thresholds fell back to NaN for lack of samples");
    }
    info!(
        n_days = baseline.n_times(),
        rows, cols, "built percentile thresholds"
    );
    Ok(PercentileThresholdTable::new(percentile, values, n_insufficient))
}

/// Thresholds for all 365 days of one cell and the number that were NaN.
fn cell_thresholds(
    baseline: &GridSeries,
    row: usize,
    col: usize,
    slots: &[usize],
    windows: &[Vec<usize>],
    p: f64,
    min_samples: usize,
) -> (Vec<f64>, usize) {
    let mut buckets: Vec<Vec<f64>> = vec![Vec::new(); DAYS_PER_YEAR];
    for (&slot, &v) in slots.iter().zip(baseline.cell(row, col).iter()) {
        if v.is_finite() {
            buckets[slot].push(v);
        }
    }

    let mut pool = Vec::new();
    let mut missing = 0;
    let thresholds: Vec<f64> = windows
        .iter()
        .map(|window| {
            pool.clear();
            for &slot in window {
                pool.extend_from_slice(&buckets[slot]);
            }
            if pool.len() < min_samples {
                missing += 1;
                return f64::NAN;
            }
            sort_ascending(&mut pool);
            quantile_type7(&pool, p)
        })
        .collect();
    (thresholds, missing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use climdex_calendar::{Calendar, DailyDate, daily_sequence};
    use climdex_grid::GridCoords;
    use std::sync::Arc;

    fn baseline(values: Array3<f64>, start: DailyDate, calendar: Calendar) -> GridSeries {
        let (n, rows, cols) = values.dim();
        let times = daily_sequence(start, n, calendar).unwrap();
        let lat: Vec<f64> = (0..rows).map(|r| r as f64).collect();
        let lon: Vec<f64> = (0..cols).map(|c| c as f64).collect();
        let coords = Arc::new(GridCoords::from_axes(&lat, &lon));
        GridSeries::new("tasmax", "MOD", "hist", times, values, coords).unwrap()
    }

    fn jan1(year: i32) -> DailyDate {
        DailyDate::new(year, 1, 1).unwrap()
    }

    #[test]
    fn constant_baseline_gives_constant() {
        let series = baseline(
            Array3::from_elem((365 * 3, 1, 2), 283.15),
            jan1(1981),
            Calendar::NoLeap,
        );
        let config = ThresholdConfig::new();
        for pct in [10.0, 90.0] {
            let table = build_thresholds(&series, pct, &config).unwrap();
            assert_eq!(table.n_insufficient(), 0);
            for d in Doy::all() {
                assert_relative_eq!(table.get(d, 0, 1), 283.15);
            }
        }
    }

    #[test]
    fn insufficient_samples_give_nan() {
        // One year pools 5 values per day, below the default minimum of 10.
        let series = baseline(
            Array3::from_elem((365, 1, 1), 1.0),
            jan1(1981),
            Calendar::NoLeap,
        );
        let table = build_thresholds(&series, 90.0, &ThresholdConfig::new()).unwrap();
        assert_eq!(table.n_insufficient(), 365);
        assert!(table.get(Doy::new(100).unwrap(), 0, 0).is_nan());
        assert!(table.ensure_sufficient().is_err());

        let relaxed = ThresholdConfig::new().with_min_samples(5);
        let table = build_thresholds(&series, 90.0, &relaxed).unwrap();
        assert_eq!(table.n_insufficient(), 0);
    }

    #[test]
    fn nan_values_are_not_pooled() {
        let mut values = Array3::from_elem((365 * 2, 1, 1), 5.0);
        values[[100, 0, 0]] = f64::NAN;
        let series = baseline(values, jan1(1981), Calendar::NoLeap);
        let table = build_thresholds(&series, 90.0, &ThresholdConfig::new()).unwrap();
        // Day 101 pools 2 years x 5 days minus one NaN = 9 values.
        assert!(table.get(Doy::new(101).unwrap(), 0, 0).is_nan());
        assert_relative_eq!(table.get(Doy::new(110).unwrap(), 0, 0), 5.0);
    }

    #[test]
    fn window_wraps_year_end() {
        // Value encodes the day-of-year; 31 Dec pools 29 Dec..2 Jan.
        let n = 365 * 4;
        let series = {
            let start = jan1(1981);
            let times = daily_sequence(start, n, Calendar::NoLeap).unwrap();
            let values = Array3::from_shape_fn((n, 1, 1), |(t, _, _)| times[t].doy().get() as f64);
            let coords = Arc::new(GridCoords::from_axes(&[0.0], &[0.0]));
            GridSeries::new("tasmax", "MOD", "hist", times, values, coords).unwrap()
        };
        let table = build_thresholds(&series, 90.0, &ThresholdConfig::new()).unwrap();
        // Pool: {363, 364, 365, 1, 2} x 4 years. Sorted: 1x4, 2x4, 363x4,
        // 364x4, 365x4; p90 -> h = 19 * 0.9 = 17.1 -> 365.
        assert_relative_eq!(table.get(Doy::new(365).unwrap(), 0, 0), 365.0);
        // p10 -> h = 1.9 -> 1 + 0.9 * (1 - 1) = 1.
        let low = build_thresholds(&series, 10.0, &ThresholdConfig::new()).unwrap();
        assert_relative_eq!(low.get(Doy::new(365).unwrap(), 0, 0), 1.0);
    }

    #[test]
    fn leap_day_pools_with_feb_28() {
        // Standard calendar, 1996..=1999: one leap day, flagged with 1000.
        let start = jan1(1996);
        let n = 366 + 365 * 3;
        let times = daily_sequence(start, n, Calendar::Standard).unwrap();
        let values = Array3::from_shape_fn((n, 1, 1), |(t, _, _)| {
            if times[t].is_leap_day() { 1000.0 } else { 0.0 }
        });
        let coords = Arc::new(GridCoords::from_axes(&[0.0], &[0.0]));
        let series = GridSeries::new("tasmax", "MOD", "hist", times, values, coords).unwrap();
        let config = ThresholdConfig::new().with_half_window(0).with_min_samples(1);
        let table = build_thresholds(&series, 99.0, &config).unwrap();
        // Slot 59 holds four 28 Feb zeros and the leap day.
        assert!(table.get(Doy::new(59).unwrap(), 0, 0) > 0.0);
        assert_relative_eq!(table.get(Doy::new(60).unwrap(), 0, 0), 0.0);
    }

    #[test]
    fn rejects_bad_percentile() {
        let series = baseline(Array3::zeros((10, 1, 1)), jan1(1981), Calendar::NoLeap);
        for pct in [0.0, 100.0, -5.0, f64::NAN] {
            let err = build_thresholds(&series, pct, &ThresholdConfig::new()).unwrap_err();
            assert!(matches!(err, ThresholdError::InvalidPercentile { .. }));
        }
    }

    #[test]
    fn rejects_empty_baseline() {
        let series = baseline(Array3::zeros((0, 1, 1)), jan1(1981), Calendar::NoLeap);
        let err = build_thresholds(&series, 90.0, &ThresholdConfig::new()).unwrap_err();
        assert!(matches!(err, ThresholdError::EmptyBaseline { .. }));
    }
}
