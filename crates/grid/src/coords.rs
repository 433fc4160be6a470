//! Spatial coordinates of a model grid.

use ndarray::Array2;

use crate::error::GridError;

/// 2-D latitude and longitude arrays of shape `[rows, cols]`.
///
/// Curvilinear model grids carry full 2-D coordinate variables; regular
/// grids are broadcast from their 1-D axes with [`GridCoords::from_axes`].
#[derive(Debug, Clone, PartialEq)]
pub struct GridCoords {
    lat: Array2<f64>,
    lon: Array2<f64>,
}

impl GridCoords {
    /// Creates coordinates from 2-D arrays.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::CoordShapeMismatch`] if the shapes differ.
    pub fn new(lat: Array2<f64>, lon: Array2<f64>) -> Result<Self, GridError> {
        if lat.dim() != lon.dim() {
            return Err(GridError::CoordShapeMismatch {
                lat: lat.dim(),
                lon: lon.dim(),
            });
        }
        Ok(Self { lat, lon })
    }

    /// Broadcasts 1-D axes to 2-D: rows follow latitude, columns longitude.
    pub fn from_axes(lat: &[f64], lon: &[f64]) -> Self {
        let shape = (lat.len(), lon.len());
        Self {
            lat: Array2::from_shape_fn(shape, |(r, _)| lat[r]),
            lon: Array2::from_shape_fn(shape, |(_, c)| lon[c]),
        }
    }

    /// `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        self.lat.dim()
    }

    pub fn lat(&self) -> &Array2<f64> {
        &self.lat
    }

    pub fn lon(&self) -> &Array2<f64> {
        &self.lon
    }

    /// `(lat, lon)` of one cell. Panics if out of bounds.
    pub fn cell(&self, row: usize, col: usize) -> (f64, f64) {
        (self.lat[[row, col]], self.lon[[row, col]])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn from_axes_broadcasts() {
        let coords = GridCoords::from_axes(&[60.0, 61.0, 62.0], &[5.0, 6.0]);
        assert_eq!(coords.shape(), (3, 2));
        assert_eq!(coords.cell(2, 0), (62.0, 5.0));
        assert_eq!(coords.cell(0, 1), (60.0, 6.0));
    }

    #[test]
    fn new_rejects_mismatched_shapes() {
        let lat = array![[1.0, 2.0]];
        let lon = array![[1.0], [2.0]];
        assert_eq!(
            GridCoords::new(lat, lon).unwrap_err(),
            GridError::CoordShapeMismatch {
                lat: (1, 2),
                lon: (2, 1),
            }
        );
    }

    #[test]
    fn new_accepts_curvilinear() {
        let lat = array![[70.0, 70.5], [71.0, 71.5]];
        let lon = array![[20.0, 22.0], [19.0, 21.0]];
        let coords = GridCoords::new(lat, lon).unwrap();
        assert_eq!(coords.cell(1, 1), (71.5, 21.0));
    }
}
