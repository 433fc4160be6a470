//! Annual index values on a grid.

use std::sync::Arc;

use ndarray::{Array3, ArrayView2, ArrayView3, Axis, s};

use crate::coords::GridCoords;
use crate::error::GridError;

/// One index value per (year, row, col).
///
/// Undefined cells are NaN; every year of the source series is present.
#[derive(Debug, Clone)]
pub struct AnnualIndexGrid {
    index_id: String,
    model: String,
    scenario: String,
    years: Vec<i32>,
    values: Array3<f64>,
    coords: Arc<GridCoords>,
}

impl AnnualIndexGrid {
    /// Validates and assembles an annual grid.
    ///
    /// # Errors
    ///
    /// Returns [`GridError`] if `years` does not match the leading axis of
    /// `values`, is not strictly ascending, or the spatial shape differs
    /// from `coords`.
    pub fn new(
        index_id: impl Into<String>,
        model: impl Into<String>,
        scenario: impl Into<String>,
        years: Vec<i32>,
        values: Array3<f64>,
        coords: Arc<GridCoords>,
    ) -> Result<Self, GridError> {
        let (n_years, rows, cols) = values.dim();
        if years.len() != n_years {
            return Err(GridError::YearLengthMismatch {
                years: years.len(),
                values: n_years,
            });
        }
        if (rows, cols) != coords.shape() {
            return Err(GridError::SpatialShapeMismatch {
                values: (rows, cols),
                coords: coords.shape(),
            });
        }
        if let Some(i) = years.windows(2).position(|w| w[1] <= w[0]) {
            return Err(GridError::YearsNotAscending { index: i + 1 });
        }
        Ok(Self {
            index_id: index_id.into(),
            model: model.into(),
            scenario: scenario.into(),
            years,
            values,
            coords,
        })
    }

    pub fn index_id(&self) -> &str {
        &self.index_id
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn scenario(&self) -> &str {
        &self.scenario
    }

    pub fn years(&self) -> &[i32] {
        &self.years
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

    /// Value of one cell in `year`, or `None` if the year is absent.
    pub fn get(&self, year: i32, row: usize, col: usize) -> Option<f64> {
        let i = self.years.binary_search(&year).ok()?;
        self.values.get([i, row, col]).copied()
    }

    /// Spatial slice for `year`.
    pub fn year_slice(&self, year: i32) -> Option<ArrayView2<'_, f64>> {
        let i = self.years.binary_search(&year).ok()?;
        Some(self.values.index_axis(Axis(0), i))
    }

    /// `(year, value)` pairs of one cell in year order.
    pub fn cell_series(&self, row: usize, col: usize) -> Vec<(i32, f64)> {
        self.years
            .iter()
            .copied()
            .zip(self.values.slice(s![.., row, col]).iter().copied())
            .collect()
    }
}
