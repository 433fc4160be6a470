//! Calendar-year grouping of a date axis.

use std::ops::Range;

use crate::date::DailyDate;

/// Splits an ordered date axis into contiguous calendar-year ranges.
///
/// Returns `(year, index_range)` pairs in ascending year order. Partial
/// years at either end of the record are returned with whatever days they
/// contain. The caller guarantees `dates` is sorted ascending.
pub fn year_ranges(dates: &[DailyDate]) -> Vec<(i32, Range<usize>)> {
    let mut ranges = Vec::new();
    let mut start = 0;
    for i in 1..=dates.len() {
        if i == dates.len() || dates[i].year() != dates[start].year() {
            ranges.push((dates[start].year(), start..i));
            start = i;
        }
    }
    ranges
}
