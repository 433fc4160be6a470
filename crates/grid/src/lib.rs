//! Labelled 3-D grids for climate index computation.
//!
//! - [`GridSeries`]: daily values of one variable, `[time, row, col]`.
//! - [`AnnualIndexGrid`]: one index value per year and cell, `[year, row, col]`.
//! - [`GridCoords`]: 2-D latitude/longitude shared by every grid of a run.
//!
//! All three validate their shapes on construction and are read-only
//! afterwards. Missing data is NaN.
//!
//! ```rust
//! use std::sync::Arc;
//! use climdex_calendar::{Calendar, DailyDate, daily_sequence};
//! use climdex_grid::{GridCoords, GridSeries};
//! use ndarray::Array3;
//!
//! let coords = Arc::new(GridCoords::from_axes(&[60.0, 61.0], &[10.0]));
//! let start = DailyDate::new(2000, 1, 1).unwrap();
//! let times = daily_sequence(start, 3, Calendar::Standard).unwrap();
//! let values = Array3::<f64>::zeros((3, 2, 1));
//! let series = GridSeries::new("tasmax", "MODEL", "hist", times, values, coords).unwrap();
//! assert_eq!(series.shape(), (2, 1));
//! ```

mod annual;
mod coords;
mod error;
mod series;

pub use annual::AnnualIndexGrid;
pub use coords::GridCoords;
pub use error::GridError;
pub use series::GridSeries;
