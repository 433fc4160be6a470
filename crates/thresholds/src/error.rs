//! Error types for the climdex-thresholds crate.

/// Error type for threshold construction.
///
/// `Clone` so that a failed build can be handed to every caller waiting on
/// the same [`ThresholdCache`](crate::ThresholdCache) entry.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ThresholdError {
    /// Returned when the percentile is not strictly between 0 and 100.
    #[error("invalid percentile: {percentile} (must be in (0, 100))")]
    InvalidPercentile {
        /// The rejected percentile.
        percentile: f64,
    },

    /// Returned when the baseline series has no time steps.
    #[error("baseline for {variable} ({model}, {scenario}) has no time steps")]
    EmptyBaseline {
        /// Variable of the baseline series.
        variable: String,
        /// Model of the baseline series.
        model: String,
        /// Scenario of the baseline series.
        scenario: String,
    },

    /// Returned when a configuration parameter is invalid.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the problem.
        reason: String,
    },

    /// Returned by strict callers when some thresholds fell back to NaN.
    #[error("insufficient baseline: {n_insufficient} of {total} day/cell thresholds lack samples")]
    InsufficientBaseline {
        /// Number of NaN thresholds.
        n_insufficient: usize,
        /// Total number of thresholds in the table.
        total: usize,
    },
}
