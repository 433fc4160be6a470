//! Daily gridded series of one variable.

use std::ops::Range;
use std::sync::Arc;

use climdex_calendar::{DailyDate, year_ranges};
use ndarray::{Array3, ArrayView1, ArrayView3, Axis, s};

use crate::coords::GridCoords;
use crate::error::GridError;

/// Daily values of one variable for one model run, `[time, row, col]`.
///
/// # Invariants
///
/// - `times` is strictly increasing and `times.len() == values.shape[0]`.
/// - `values.shape[1..] == coords.shape()`.
#[derive(Debug, Clone)]
pub struct GridSeries {
    variable: String,
    model: String,
    scenario: String,
    times: Vec<DailyDate>,
    values: Array3<f64>,
    coords: Arc<GridCoords>,
}

impl GridSeries {
    /// Validates and assembles a series.
    ///
    /// # Errors
    ///
    /// Returns [`GridError`] if the time axis or spatial shape is
    /// inconsistent with `values`, or if `times` is not strictly increasing.
    pub fn new(
        variable: impl Into<String>,
        model: impl Into<String>,
        scenario: impl Into<String>,
        times: Vec<DailyDate>,
        values: Array3<f64>,
        coords: Arc<GridCoords>,
    ) -> Result<Self, GridError> {
        let (n_time, rows, cols) = values.dim();
        if times.len() != n_time {
            return Err(GridError::TimeLengthMismatch {
                times: times.len(),
                values: n_time,
            });
        }
        if (rows, cols) != coords.shape() {
            return Err(GridError::SpatialShapeMismatch {
                values: (rows, cols),
                coords: coords.shape(),
            });
        }
        if let Some(i) = times.windows(2).position(|w| w[1] <= w[0]) {
            return Err(GridError::TimesNotIncreasing {
                index: i + 1,
                previous: times[i].iso(),
                current: times[i + 1].iso(),
            });
        }
        Ok(Self {
            variable: variable.into(),
            model: model.into(),
            scenario: scenario.into(),
            times,
            values,
            coords,
        })
    }

    /// Swaps in `shared` if it holds the same coordinates, so series read
    /// from different files point at one allocation.
    pub fn with_shared_coords(mut self, shared: &Arc<GridCoords>) -> Self {
        if !Arc::ptr_eq(&self.coords, shared) && *self.coords == **shared {
            self.coords = Arc::clone(shared);
        }
        self
    }

    pub fn variable(&self) -> &str {
        &self.variable
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn scenario(&self) -> &str {
        &self.scenario
    }

    pub fn times(&self) -> &[DailyDate] {
        &self.times
    }

    pub fn values(&self) -> ArrayView3<'_, f64> {
        self.values.view()
    }

    pub fn coords(&self) -> &Arc<GridCoords> {
        &self.coords
    }

    /// `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        self.coords.shape()
    }

    pub fn n_times(&self) -> usize {
        self.times.len()
    }

    /// Daily values of one cell over the whole record.
    pub fn cell(&self, row: usize, col: usize) -> ArrayView1<'_, f64> {
        self.values.slice(s![.., row, col])
    }

    /// Daily values of one cell over `range` of the time axis.
    pub fn cell_range(&self, row: usize, col: usize, range: Range<usize>) -> ArrayView1<'_, f64> {
        self.values.slice(s![range, row, col])
    }

    /// Contiguous calendar-year ranges of the time axis, ascending.
    pub fn year_ranges(&self) -> Vec<(i32, Range<usize>)> {
        year_ranges(&self.times)
    }

    /// Number of time steps in which every cell is NaN.
    pub fn count_all_nan_steps(&self) -> usize {
        self.values
            .axis_iter(Axis(0))
            .filter(|step| step.iter().all(|v| v.is_nan()))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use climdex_calendar::{Calendar, daily_sequence};

    fn coords(rows: usize, cols: usize) -> Arc<GridCoords> {
        let lat: Vec<f64> = (0..rows).map(|r| 60.0 + r as f64).collect();
        let lon: Vec<f64> = (0..cols).map(|c| 10.0 + c as f64).collect();
        Arc::new(GridCoords::from_axes(&lat, &lon))
    }

    fn times(start: (i32, u8, u8), n: usize) -> Vec<DailyDate> {
        let start = DailyDate::new(start.0, start.1, start.2).unwrap();
        daily_sequence(start, n, Calendar::Standard).unwrap()
    }

    #[test]
    fn new_valid() {
        let values = Array3::from_shape_fn((4, 2, 3), |(t, r, c)| (t * 100 + r * 10 + c) as f64);
        let series = GridSeries::new("pr", "M", "hist", times((2000, 1, 1), 4), values, coords(2, 3))
            .unwrap();
        assert_eq!(series.variable(), "pr");
        assert_eq!(series.n_times(), 4);
        assert_eq!(series.cell(1, 2).to_vec(), vec![12.0, 112.0, 212.0, 312.0]);
        assert_eq!(series.cell_range(0, 1, 1..3).to_vec(), vec![101.0, 201.0]);
    }

    #[test]
    fn new_rejects_time_length() {
        let values = Array3::<f64>::zeros((4, 2, 3));
        let err = GridSeries::new("pr", "M", "hist", times((2000, 1, 1), 3), values, coords(2, 3))
            .unwrap_err();
        assert_eq!(
            err,
            GridError::TimeLengthMismatch {
                times: 3,
                values: 4,
            }
        );
    }

    #[test]
    fn new_rejects_spatial_shape() {
        let values = Array3::<f64>::zeros((2, 3, 2));
        let err = GridSeries::new("pr", "M", "hist", times((2000, 1, 1), 2), values, coords(2, 3))
            .unwrap_err();
        assert!(matches!(err, GridError::SpatialShapeMismatch { .. }));
    }

    #[test]
    fn new_rejects_unsorted_times() {
        let mut t = times((2000, 1, 1), 3);
        t.swap(1, 2);
        let values = Array3::<f64>::zeros((3, 1, 1));
        let err = GridSeries::new("pr", "M", "hist", t, values, coords(1, 1)).unwrap_err();
        assert_eq!(
            err,
            GridError::TimesNotIncreasing {
                index: 2,
                previous: "2000-01-03".to_string(),
                current: "2000-01-02".to_string(),
            }
        );
    }

    #[test]
    fn year_ranges_of_series() {
        let values = Array3::<f64>::zeros((4, 1, 1));
        let series =
            GridSeries::new("pr", "M", "hist", times((1999, 12, 30), 4), values, coords(1, 1))
                .unwrap();
        assert_eq!(series.year_ranges(), vec![(1999, 0..2), (2000, 2..4)]);
    }

    #[test]
    fn with_shared_coords_only_when_equal() {
        let values = Array3::<f64>::zeros((2, 2, 3));
        let series =
            GridSeries::new("pr", "M", "hist", times((2000, 1, 1), 2), values, coords(2, 3))
                .unwrap();
        let same = coords(2, 3);
        let shared = series.clone().with_shared_coords(&same);
        assert!(Arc::ptr_eq(shared.coords(), &same));

        let other = Arc::new(GridCoords::from_axes(&[0.0, 1.0], &[0.0, 1.0, 2.0]));
        let kept = series.with_shared_coords(&other);
        assert!(!Arc::ptr_eq(kept.coords(), &other));
    }

    #[test]
    fn count_all_nan_steps() {
        let mut values = Array3::<f64>::zeros((3, 1, 2));
        values[[1, 0, 0]] = f64::NAN;
        values[[1, 0, 1]] = f64::NAN;
        values[[2, 0, 0]] = f64::NAN;
        let series =
            GridSeries::new("pr", "M", "hist", times((2000, 1, 1), 3), values, coords(1, 2))
                .unwrap();
        assert_eq!(series.count_all_nan_steps(), 1);
    }
}
