//! Contiguous daily date sequences.

use crate::calendar::Calendar;
use crate::date::DailyDate;
use crate::error::CalendarError;

/// Generates `n_days` consecutive dates starting at `start` in `calendar`.
///
/// # Errors
///
/// Propagates [`CalendarError::Overflow`] if the sequence runs past the
/// representable range.
///
/// ```ignore
/// let start = DailyDate::new(2000, 2, 27).unwrap();
/// let dates = daily_sequence(start, 3, Calendar::NoLeap).unwrap();
/// // Feb 27, Feb 28, Mar 1
/// ```
pub fn daily_sequence(
    start: DailyDate,
    n_days: usize,
    calendar: Calendar,
) -> Result<Vec<DailyDate>, CalendarError> {
    let mut dates = Vec::with_capacity(n_days);
    if n_days == 0 {
        return Ok(dates);
    }
    dates.push(start);
    let mut current = start;
    for _ in 1..n_days {
        current = calendar.next(current)?;
        dates.push(current);
    }
    Ok(dates)
}
