//! Circular day-of-year windows.

use crate::doy::{DAYS_PER_YEAR, Doy};

/// Returns the slots within `half_width` days of `center`, wrapping across
/// the year end.
///
/// The result is ordered from `center - half_width` to `center + half_width`
/// and holds `2 * half_width + 1` distinct slots. A `half_width` large
/// enough to cover the whole year returns every slot exactly once.
///
/// ```ignore
/// // 5-day window around 1 January reaches back into late December.
/// let w = doy_window(Doy::new(1).unwrap(), 2);
/// let slots: Vec<u16> = w.iter().map(|d| d.get()).collect();
/// assert_eq!(slots, vec![364, 365, 1, 2, 3]);
/// ```
pub fn doy_window(center: Doy, half_width: usize) -> Vec<Doy> {
    if 2 * half_width + 1 >= DAYS_PER_YEAR {
        return Doy::all().collect();
    }
    let n = DAYS_PER_YEAR as isize;
    let c = center.index() as isize;
    let hw = half_width as isize;
    (-hw..=hw)
        .filter_map(|offset| Doy::from_index((c + offset).rem_euclid(n) as usize).ok())
        .collect()
}
