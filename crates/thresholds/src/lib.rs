//! Per-calendar-day percentile thresholds for spell-duration indices.
//!
//! A baseline [`GridSeries`](climdex_grid::GridSeries) is reduced to a
//! [`PercentileThresholdTable`] holding one threshold per day-of-year and
//! grid cell. For each day the finite baseline values within a circular
//! window of neighbouring days, across all baseline years, are pooled and
//! the requested percentile is taken by linear interpolation (type 7).
//!
//! # Pipeline
//!
//! ```text
//!  baseline GridSeries ──▶ bucket by Doy ──▶ pool ±half_window ──▶ quantile
//!                                                      │
//!                          ThresholdCache ◀────────────┘
//!                      (one build per BaselineKey)
//! ```
//!
//! Too few samples for a (day, cell) gives a NaN threshold rather than an
//! error; the count is kept on the table and
//! [`PercentileThresholdTable::ensure_sufficient`] turns it into an error
//! for callers that need every threshold.

mod build;
mod cache;
mod config;
mod error;
mod table;

pub use build::build_thresholds;
pub use cache::{BaselineKey, ThresholdCache};
pub use config::ThresholdConfig;
pub use error::ThresholdError;
pub use table::PercentileThresholdTable;
