//! NaN-aware statistical helpers for annual index reductions.
//!
//! Functions in this crate operate on plain `&[f64]` slices. Missing data is
//! represented as NaN; callers strip it with [`drop_nan`] before applying the
//! order statistics, which assume NaN-free input. [`max_window_sum`] is the
//! exception: it keeps NaN in place so windows span calendar positions.

/// Copies the non-NaN values of `data`, preserving order.
pub fn drop_nan(data: &[f64]) -> Vec<f64> {
    data.iter().copied().filter(|v| !v.is_nan()).collect()
}

/// Like [`drop_nan`] but reuses `out` as scratch storage.
pub fn drop_nan_into(data: &[f64], out: &mut Vec<f64>) {
    out.clear();
    out.extend(data.iter().copied().filter(|v| !v.is_nan()));
}

/// Sorts ascending using IEEE total ordering.
pub fn sort_ascending(data: &mut [f64]) {
    data.sort_unstable_by(f64::total_cmp);
}

/// Arithmetic mean of a slice. Returns 0.0 if empty.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let sum: f64 = data.iter().sum();
    sum / data.len() as f64
}

/// Largest value, or `None` for an empty slice.
pub fn max_value(data: &[f64]) -> Option<f64> {
    data.iter().copied().max_by(f64::total_cmp)
}

/// The `n`-th largest value (1-based descending rank).
///
/// Duplicates occupy separate ranks, so for `[5, 5, 4]` the 2nd largest is 5.
/// Returns `None` if `n == 0` or `n > data.len()`.
pub fn nth_largest(data: &[f64], n: usize) -> Option<f64> {
    if n == 0 || n > data.len() {
        return None;
    }
    nth_ascending(data, data.len() - n)
}

/// The `n`-th smallest value (1-based ascending rank).
///
/// Returns `None` if `n == 0` or `n > data.len()`.
pub fn nth_smallest(data: &[f64], n: usize) -> Option<f64> {
    if n == 0 || n > data.len() {
        return None;
    }
    nth_ascending(data, n - 1)
}

fn nth_ascending(data: &[f64], idx: usize) -> Option<f64> {
    let mut buf = data.to_vec();
    let (_, v, _) = buf.select_nth_unstable_by(idx, f64::total_cmp);
    Some(*v)
}

/// Largest sum over `window` consecutive elements, skipping NaN.
///
/// Windows are taken over the full sequence, so a NaN element occupies its
/// position and only the finite values inside each window are added. A
/// slice shorter than `window` is summed whole. Returns `None` for a zero
/// window or when every element is NaN.
pub fn max_window_sum(data: &[f64], window: usize) -> Option<f64> {
    if window == 0 || data.iter().all(|v| v.is_nan()) {
        return None;
    }
    let nansum = |w: &[f64]| w.iter().filter(|v| !v.is_nan()).sum::<f64>();
    if data.len() <= window {
        return Some(nansum(data));
    }
    data.windows(window).map(nansum).max_by(f64::total_cmp)
}

/// Mean of the `k` largest values, or of all values when fewer than `k`.
///
/// Returns `None` for an empty slice or `k == 0`.
pub fn mean_of_largest(data: &[f64], k: usize) -> Option<f64> {
    if data.is_empty() || k == 0 {
        return None;
    }
    let mut buf = data.to_vec();
    buf.sort_unstable_by(|a, b| b.total_cmp(a));
    buf.truncate(k);
    Some(mean(&buf))
}

/// Linear interpolation between order statistics (R type 7, numpy default).
///
/// **Expects pre-sorted, NaN-free input** (caller's responsibility). `p` is
/// a probability in `[0, 1]`.
///
/// # Panics
///
/// Panics if `sorted` is empty.
pub fn quantile_type7(sorted: &[f64], p: f64) -> f64 {
    assert!(
        !sorted.is_empty(),
        "quantile_type7: input must not be empty"
    );
    let n = sorted.len();
    let h = (n - 1) as f64 * p;
    let lo = h.floor() as usize;
    let hi = (lo + 1).min(n - 1);
    sorted[lo] + (h - h.floor()) * (sorted[hi] - sorted[lo])
}
