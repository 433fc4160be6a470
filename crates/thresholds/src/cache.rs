//! Shared cache of threshold tables keyed by baseline identity.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use climdex_grid::GridSeries;
use tracing::debug;

use crate::build::build_thresholds;
use crate::config::ThresholdConfig;
use crate::error::ThresholdError;
use crate::table::PercentileThresholdTable;

/// Identity of a threshold table: the baseline run plus build parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BaselineKey {
    model: String,
    scenario: String,
    variable: String,
    percentile_bits: u64,
    config: ThresholdConfig,
}

impl BaselineKey {
    pub fn new(baseline: &GridSeries, percentile: f64, config: &ThresholdConfig) -> Self {
        Self {
            model: baseline.model().to_string(),
            scenario: baseline.scenario().to_string(),
            variable: baseline.variable().to_string(),
            percentile_bits: percentile.to_bits(),
            config: *config,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn scenario(&self) -> &str {
        &self.scenario
    }

    pub fn variable(&self) -> &str {
        &self.variable
    }

    pub fn percentile(&self) -> f64 {
        f64::from_bits(self.percentile_bits)
    }
}

type Slot = Arc<OnceLock<Result<Arc<PercentileThresholdTable>, ThresholdError>>>;

/// Builds each threshold table at most once and shares it read-only.
///
/// Concurrent requests for the same [`BaselineKey`] block on a single
/// build; requests for different keys build in parallel. Failed builds are
/// cached too, so every caller sees the same error.
#[derive(Debug, Default)]
pub struct ThresholdCache {
    slots: Mutex<HashMap<BaselineKey, Slot>>,
    builds: AtomicUsize,
}

impl ThresholdCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the table for `key`, running `build` if it is not cached.
    ///
    /// # Errors
    ///
    /// Returns the (cached) error of the build for this key.
    pub fn get_or_build<F>(
        &self,
        key: BaselineKey,
        build: F,
    ) -> Result<Arc<PercentileThresholdTable>, ThresholdError>
    where
        F: FnOnce() -> Result<PercentileThresholdTable, ThresholdError>,
    {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(slots.entry(key.clone()).or_default())
        };
        slot.get_or_init(|| {
            self.builds.fetch_add(1, Ordering::Relaxed);
            debug!(
                model = key.model(),
                scenario = key.scenario(),
                variable = key.variable(),
                percentile = key.percentile(),
                "threshold cache miss"
            );
            build().map(Arc::new)
        })
        .clone()
    }

    /// Thresholds for `baseline` at `percentile`, built with
    /// [`build_thresholds`] on first use.
    ///
    /// # Errors
    ///
    /// See [`build_thresholds`].
    pub fn thresholds_for(
        &self,
        baseline: &GridSeries,
        percentile: f64,
        config: &ThresholdConfig,
    ) -> Result<Arc<PercentileThresholdTable>, ThresholdError> {
        let key = BaselineKey::new(baseline, percentile, config);
        self.get_or_build(key, || build_thresholds(baseline, percentile, config))
    }

    /// Number of builds run so far.
    pub fn builds(&self) -> usize {
        self.builds.load(Ordering::Relaxed)
    }

    /// Number of cached keys.
    pub fn len(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
