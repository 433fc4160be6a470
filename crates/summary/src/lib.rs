//! # climdex-summary
//!
//! Extract annual index values at named point locations and reduce them to
//! min/mean/max over eras and decades for reporting.

mod error;
mod location;
mod period;
mod summarize;

pub use error::SummaryError;
pub use location::{Location, default_locations, haversine_km, nearest_cell};
pub use period::{Period, decades_covering, default_eras};
pub use summarize::{SummaryRow, summarize, to_json};
