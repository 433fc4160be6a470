//! Summary error types.

/// Errors that can occur while building point summaries.
#[derive(Debug, thiserror::Error)]
pub enum SummaryError {
    /// A period whose start year is after its end year.
    #[error("period '{label}' is empty: start {start} > end {end}")]
    InvalidPeriod {
        /// Period label.
        label: String,
        /// First year of the period.
        start: i32,
        /// Last year of the period.
        end: i32,
    },

    /// A location outside valid WGS84 ranges.
    #[error("location '{name}' has invalid coordinates ({lat}, {lon})")]
    InvalidLocation {
        /// Location name.
        name: String,
        /// Latitude in degrees.
        lat: f64,
        /// Longitude in degrees.
        lon: f64,
    },

    /// JSON serialization failed.
    #[error("serialization error: {reason}")]
    Serialization {
        /// Description of the serde failure.
        reason: String,
    },
}
