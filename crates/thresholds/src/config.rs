//! Configuration for threshold construction.

use climdex_calendar::DAYS_PER_YEAR;

use crate::error::ThresholdError;

/// Window and sample-size settings for [`build_thresholds`](crate::build_thresholds).
///
/// # Example
///
/// ```
/// use climdex_thresholds::ThresholdConfig;
///
/// let config = ThresholdConfig::new().with_half_window(3).with_min_samples(20);
/// assert_eq!(config.window_days(), 7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ThresholdConfig {
    half_window: usize,
    min_samples: usize,
}

impl ThresholdConfig {
    /// Defaults: `half_window = 2` (5-day window), `min_samples = 10`.
    pub fn new() -> Self {
        Self {
            half_window: 2,
            min_samples: 10,
        }
    }

    /// Sets the number of days pooled on each side of the target day.
    pub fn with_half_window(mut self, half_window: usize) -> Self {
        self.half_window = half_window;
        self
    }

    /// Sets the minimum number of finite values needed for a threshold.
    pub fn with_min_samples(mut self, min_samples: usize) -> Self {
        self.min_samples = min_samples;
        self
    }

    pub fn half_window(&self) -> usize {
        self.half_window
    }

    /// Total window width in days, `2 * half_window + 1`.
    pub fn window_days(&self) -> usize {
        2 * self.half_window + 1
    }

    pub fn min_samples(&self) -> usize {
        self.min_samples
    }

    /// Checks that the window fits in one year and `min_samples >= 1`.
    pub fn validate(&self) -> Result<(), ThresholdError> {
        if self.window_days() > DAYS_PER_YEAR {
            return Err(ThresholdError::InvalidConfig {
                reason: format!(
                    "window of {} days exceeds {DAYS_PER_YEAR}",
                    self.window_days()
                ),
            });
        }
        if self.min_samples == 0 {
            return Err(ThresholdError::InvalidConfig {
                reason: "min_samples must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self::new()
    }
}
