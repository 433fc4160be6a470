//! Error types for the climdex-calendar crate.

/// Error type for all fallible operations in the climdex-calendar crate.
///
/// Covers validation of day-of-year values and month/day pairs, unknown CF
/// calendar names, and date arithmetic that leaves the representable range.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalendarError {
    /// Returned when a day-of-year value is outside the valid range 1..=365.
    #[error("invalid day of year: {doy} (must be 1..=365)")]
    InvalidDoy {
        /// The invalid day-of-year value that was provided.
        doy: u16,
    },

    /// Returned when a month number is outside the valid range 1..=12.
    #[error("invalid month: {month} (must be 1..=12)")]
    InvalidMonth {
        /// The invalid month number that was provided.
        month: u8,
    },

    /// Returned when a day number exceeds the length of the given month.
    #[error("invalid day: {day} for {year}-{month:02} (max {max_day})")]
    InvalidDay {
        /// Year of the rejected date.
        year: i32,
        /// The month for which the day is invalid.
        month: u8,
        /// The invalid day number that was provided.
        day: u8,
        /// The maximum valid day for the given month and year.
        max_day: u8,
    },

    /// Returned when a CF `calendar` attribute names a calendar we cannot map.
    #[error("unsupported calendar: '{name}'")]
    UnsupportedCalendar {
        /// The calendar name as found in the file.
        name: String,
    },

    /// Returned when offset arithmetic overflows the supported date range.
    #[error("date overflow adding {days} days to {base}")]
    Overflow {
        /// Base date rendered as `YYYY-MM-DD`.
        base: String,
        /// The offset in days.
        days: i64,
    },
}
