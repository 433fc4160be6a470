//! Reductions over one cell-year of daily values.

use climdex_runs::longest_run;
use climdex_stats::{
    drop_nan_into, max_value, max_window_sum, mean_of_largest, nth_largest, nth_smallest,
};

/// A reduction from one cell-year of daily values to a scalar.
///
/// Fixed thresholds are stored in the units of the input data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reduction {
    /// `n`-th highest value (1-based, ties counted individually).
    NthLargest(usize),
    /// `n`-th lowest value (1-based, ties counted individually).
    NthSmallest(usize),
    /// Highest value.
    Max,
    /// Highest sum over this many consecutive calendar days.
    MaxWindowSum(usize),
    /// Mean of this many highest values.
    MeanOfLargest(usize),
    /// Days strictly above the threshold.
    CountAbove(f64),
    /// Days strictly below the threshold.
    CountBelow(f64),
    /// Longest run of days strictly above the threshold.
    LongestRunAbove(f64),
    /// Longest run of days strictly below the threshold.
    LongestRunBelow(f64),
}

impl Reduction {
    /// Applies the reduction to the daily values of one cell-year.
    ///
    /// See [`Reduction::apply_with`].
    pub fn apply(&self, daily: &[f64]) -> f64 {
        self.apply_with(daily, &mut Vec::new())
    }

    /// Applies the reduction, reusing `valid` as scratch storage.
    ///
    /// `daily` keeps missing days as NaN in their calendar position. Order
    /// statistics and counts use the valid days only. Windows and runs are
    /// taken over calendar days: a missing day adds nothing to a window sum
    /// and breaks a run. Returns NaN when every day is missing or when a
    /// rank needs more valid days than are present.
    pub fn apply_with(&self, daily: &[f64], valid: &mut Vec<f64>) -> f64 {
        drop_nan_into(daily, valid);
        if valid.is_empty() {
            return f64::NAN;
        }
        let result = match *self {
            Self::NthLargest(n) => nth_largest(valid, n),
            Self::NthSmallest(n) => nth_smallest(valid, n),
            Self::Max => max_value(valid),
            Self::MaxWindowSum(window) => max_window_sum(daily, window),
            Self::MeanOfLargest(k) => mean_of_largest(valid, k),
            Self::CountAbove(t) => Some(valid.iter().filter(|&&v| v > t).count() as f64),
            Self::CountBelow(t) => Some(valid.iter().filter(|&&v| v < t).count() as f64),
            Self::LongestRunAbove(t) => Some(longest_flagged(daily, |v| v > t)),
            Self::LongestRunBelow(t) => Some(longest_flagged(daily, |v| v < t)),
        };
        result.unwrap_or(f64::NAN)
    }
}

// NaN compares false either way, so missing days are never flagged.
fn longest_flagged(daily: &[f64], flag: impl Fn(f64) -> bool) -> f64 {
    let flags: Vec<bool> = daily.iter().map(|&v| flag(v)).collect();
    longest_run(&flags) as f64
}
