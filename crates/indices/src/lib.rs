//! Annual climate extreme indices from daily gridded series.
//!
//! # Pipeline
//!
//! ```text
//!  GridSeries ──▶ year_ranges ──▶ IndexCategory ─┬─ Annual: drop NaN ──▶ Reduction
//!                                                └─ Spell: thresholds ──▶ run_lengths
//!                                                      (ThresholdCache)
//!                                                            │
//!                                               AnnualIndexGrid per index
//! ```
//!
//! The [`IndexCatalog`] is built once, with fixed thresholds converted to
//! the declared [`InputUnits`], and handed to an [`IndexEngine`].
//! [`run_batch`] maps the engine over many [`WorkUnit`]s in parallel and
//! collects per-unit failures instead of aborting.
//!
//! # Quick start
//!
//! ```no_run
//! use std::sync::Arc;
//! use climdex_indices::{IndexCatalog, IndexEngine, InputUnits};
//! # fn load() -> climdex_grid::GridSeries { unimplemented!() }
//!
//! let catalog = Arc::new(IndexCatalog::new(InputUnits::default()));
//! let engine = IndexEngine::new(catalog);
//! let tasmax = load();
//! for result in engine.compute(&tasmax, &["hd", "su"], None) {
//!     let grid = result.unwrap();
//!     println!("{}: {} years", grid.index_id(), grid.years().len());
//! }
//! ```
//!
//! # Index set
//!
//! | id | variable | definition |
//! |----|----------|------------|
//! | `hd` | tasmax | 6th highest daily value |
//! | `cd` | tasmin | 6th lowest daily value |
//! | `rx1day` | pr | maximum daily value |
//! | `rx5day` | pr | maximum 5-day sum |
//! | `hsd` | prsn | mean of the 5 highest daily values |
//! | `su` | tasmax | days > 25 °C |
//! | `dw` | tasmin | days < -30 °C |
//! | `r10mm` | pr | days > 10 mm |
//! | `cwd` | pr | longest run of days > 1 mm |
//! | `cdd` | pr | longest run of days < 1 mm |
//! | `wndd` | sfcWind | days > 10 m/s |
//! | `wsdi` | tasmax | days in runs of >= 5 above the calendar-day 90th percentile |
//! | `csdi` | tasmin | days in runs of >= 5 below the calendar-day 10th percentile |

mod batch;
mod catalog;
mod engine;
mod error;
mod reduction;
mod units;

pub use batch::{BatchReport, SeriesSource, UnitFailure, WorkUnit, run_batch};
pub use catalog::{
    Exceedance, IndexCatalog, IndexCategory, IndexDefinition, SPELL_MIN_RUN, SpellSpec,
};
pub use engine::IndexEngine;
pub use error::IndexError;
pub use reduction::Reduction;
pub use units::{InputUnits, PrecipitationUnits, TemperatureUnits};
