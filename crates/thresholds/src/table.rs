//! Threshold table indexed by day-of-year and grid cell.

use climdex_calendar::Doy;
use ndarray::{Array3, ArrayView1, s};

use crate::error::ThresholdError;

/// Thresholds of shape `[365, rows, cols]` for one percentile.
#[derive(Debug, Clone)]
pub struct PercentileThresholdTable {
    percentile: f64,
    values: Array3<f64>,
    n_insufficient: usize,
}

impl PercentileThresholdTable {
    pub(crate) fn new(percentile: f64, values: Array3<f64>, n_insufficient: usize) -> Self {
        Self {
            percentile,
            values,
            n_insufficient,
        }
    }

    /// Percentile in `(0, 100)`.
    pub fn percentile(&self) -> f64 {
        self.percentile
    }

    /// `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        let (_, rows, cols) = self.values.dim();
        (rows, cols)
    }

    /// Threshold for `doy` at one cell. NaN where samples were insufficient.
    pub fn get(&self, doy: Doy, row: usize, col: usize) -> f64 {
        self.values[[doy.index(), row, col]]
    }

    /// The 365 thresholds of one cell, indexed by [`Doy::index`].
    pub fn cell(&self, row: usize, col: usize) -> ArrayView1<'_, f64> {
        self.values.slice(s![.., row, col])
    }

    /// Number of (day, cell) entries that fell back to NaN.
    pub fn n_insufficient(&self) -> usize {
        self.n_insufficient
    }

    /// Fails if any threshold fell back to NaN.
    ///
    /// # Errors
    ///
    /// Returns [`ThresholdError::InsufficientBaseline`] with the NaN count.
    pub fn ensure_sufficient(&self) -> Result<(), ThresholdError> {
        if self.n_insufficient > 0 {
            return Err(ThresholdError::InsufficientBaseline {
                n_insufficient: self.n_insufficient,
                total: self.values.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors() {
        let values = Array3::from_shape_fn((365, 2, 1), |(d, r, _)| d as f64 + 1000.0 * r as f64);
        let table = PercentileThresholdTable::new(90.0, values, 0);
        assert_eq!(table.shape(), (2, 1));
        assert_eq!(table.get(Doy::new(60).unwrap(), 1, 0), 1059.0);
        assert_eq!(table.cell(0, 0).len(), 365);
        assert!(table.ensure_sufficient().is_ok());
    }

    #[test]
    fn ensure_sufficient_reports_count() {
        let table = PercentileThresholdTable::new(10.0, Array3::from_elem((365, 1, 2), 0.0), 4);
        assert_eq!(
            table.ensure_sufficient().unwrap_err(),
            ThresholdError::InsufficientBaseline {
                n_insufficient: 4,
                total: 730,
            }
        );
    }
}
