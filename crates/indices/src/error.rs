//! Error types for the climdex-indices crate.

use climdex_grid::GridError;
use climdex_thresholds::ThresholdError;

/// Error type for catalog lookups, index computation and series loading.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// Returned when an index id is not registered in the catalog.
    #[error("unknown index: '{index_id}'")]
    UnknownIndex {
        /// The requested id.
        index_id: String,
    },

    /// Returned when a spell index is requested without a baseline series.
    #[error("index '{index_id}' needs a baseline series but none was supplied")]
    MissingBaseline {
        /// The spell index id.
        index_id: String,
    },

    /// Returned when the series variable is not the one the index reads.
    #[error("index '{index_id}' requires variable '{expected}', got '{found}'")]
    VariableMismatch {
        /// The requested id.
        index_id: String,
        /// Variable registered for the index.
        expected: String,
        /// Variable of the supplied series.
        found: String,
    },

    /// Returned when the baseline cannot be paired with the series.
    #[error("baseline does not match series for index '{index_id}': {reason}")]
    BaselineMismatch {
        /// The spell index id.
        index_id: String,
        /// Description of the mismatch.
        reason: String,
    },

    /// Returned when percentile thresholds could not be built.
    #[error("threshold build failed for index '{index_id}'")]
    Threshold {
        /// The spell index id.
        index_id: String,
        /// Underlying threshold error.
        #[source]
        source: ThresholdError,
    },

    /// Returned when an output grid fails validation.
    #[error(transparent)]
    Grid(#[from] GridError),

    /// Returned when a [`SeriesSource`](crate::SeriesSource) fails to load a series.
    #[error("failed to load {what}")]
    Source {
        /// Description of the series being loaded.
        what: String,
        /// Underlying loader error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Returned when a units string is not recognised.
    #[error("unrecognised {quantity} units: '{units}'")]
    UnknownUnits {
        /// Physical quantity, e.g. `temperature`.
        quantity: &'static str,
        /// The rejected units string.
        units: String,
    },
}
