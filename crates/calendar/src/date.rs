//! Daily date with leap-day aware day-of-year.

use crate::doy::{DAYS_PER_MONTH, Doy};
use crate::error::CalendarError;

/// Proleptic Gregorian leap-year rule.
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// A calendar date at daily resolution.
///
/// Dates are validated against Gregorian month lengths, so 29 February is
/// only accepted in leap years. No-leap model calendars simply never
/// produce it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DailyDate {
    year: i32,
    month: u8,
    day: u8,
}

impl DailyDate {
    /// Creates a new date.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidMonth`] or [`CalendarError::InvalidDay`]
    /// if the month/day pair does not exist in `year`.
    pub fn new(year: i32, month: u8, day: u8) -> Result<Self, CalendarError> {
        if !(1..=12).contains(&month) {
            return Err(CalendarError::InvalidMonth { month });
        }
        let max_day = days_in_month(year, month);
        if !(1..=max_day).contains(&day) {
            return Err(CalendarError::InvalidDay {
                year,
                month,
                day,
                max_day,
            });
        }
        Ok(Self { year, month, day })
    }

    /// Creates the no-leap date occupying `doy` in `year`.
    pub fn from_year_doy(year: i32, doy: Doy) -> Self {
        let (month, day) = doy.month_day();
        Self { year, month, day }
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> u8 {
        self.month
    }

    pub fn day(self) -> u8 {
        self.day
    }

    /// Returns `true` for 29 February.
    pub fn is_leap_day(self) -> bool {
        self.month == 2 && self.day == 29
    }

    /// Day-of-year slot for this date.
    ///
    /// 29 February folds onto slot 59 (28 February); all other days use
    /// their no-leap position.
    pub fn doy(self) -> Doy {
        if self.is_leap_day() {
            Doy::from_valid_month_day(2, 28)
        } else {
            Doy::from_valid_month_day(self.month, self.day)
        }
    }

    /// Renders the date as `YYYY-MM-DD`.
    pub fn iso(self) -> String {
        format!("{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl std::fmt::Display for DailyDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.iso())
    }
}

/// Gregorian month length.
pub(crate) fn days_in_month(year: i32, month: u8) -> u8 {
    if month == 2 && is_leap_year(year) {
        29
    } else {
        DAYS_PER_MONTH[month as usize]
    }
}
