//! CF calendar names and day-offset arithmetic.

use chrono::{Datelike, NaiveDate, TimeDelta};

use crate::date::DailyDate;
use crate::doy::{DAYS_PER_YEAR, Doy};
use crate::error::CalendarError;

/// Calendar of a model time axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Calendar {
    /// Proleptic Gregorian, with 29 February in leap years.
    #[default]
    Standard,
    /// 365-day calendar without leap days.
    NoLeap,
}

impl Calendar {
    /// Parses a CF-convention `calendar` attribute value.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::UnsupportedCalendar`] for calendars that do
    /// not map onto daily Gregorian dates (e.g. `360_day`, `julian`).
    pub fn from_cf(name: &str) -> Result<Self, CalendarError> {
        match name.trim().to_lowercase().as_str() {
            "standard" | "gregorian" | "proleptic_gregorian" => Ok(Self::Standard),
            "noleap" | "no_leap" | "365_day" => Ok(Self::NoLeap),
            _ => Err(CalendarError::UnsupportedCalendar {
                name: name.to_string(),
            }),
        }
    }

    /// Adds a signed number of days to `base` in this calendar.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::Overflow`] if the result is not representable.
    pub fn add_days(self, base: DailyDate, days: i64) -> Result<DailyDate, CalendarError> {
        let overflow = || CalendarError::Overflow {
            base: base.iso(),
            days,
        };
        match self {
            Self::Standard => {
                let start = NaiveDate::from_ymd_opt(
                    base.year(),
                    u32::from(base.month()),
                    u32::from(base.day()),
                )
                .ok_or_else(overflow)?;
                let end = TimeDelta::try_days(days)
                    .and_then(|delta| start.checked_add_signed(delta))
                    .ok_or_else(overflow)?;
                DailyDate::new(end.year(), end.month() as u8, end.day() as u8)
            }
            Self::NoLeap => {
                let n = DAYS_PER_YEAR as i64;
                let absolute = i64::from(base.year()) * n + base.doy().index() as i64;
                let shifted = absolute.checked_add(days).ok_or_else(overflow)?;
                let year = i32::try_from(shifted.div_euclid(n)).map_err(|_| overflow())?;
                let doy = Doy::from_index(shifted.rem_euclid(n) as usize)?;
                Ok(DailyDate::from_year_doy(year, doy))
            }
        }
    }

    /// The day after `date`.
    ///
    /// # Errors
    ///
    /// Propagates [`Calendar::add_days`] failures at the end of the range.
    pub fn next(self, date: DailyDate) -> Result<DailyDate, CalendarError> {
        self.add_days(date, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u8, d: u8) -> DailyDate {
        DailyDate::new(y, m, d).unwrap()
    }

    #[test]
    fn parse_cf_names() {
        assert_eq!(Calendar::from_cf("standard").unwrap(), Calendar::Standard);
        assert_eq!(Calendar::from_cf("Gregorian").unwrap(), Calendar::Standard);
        assert_eq!(
            Calendar::from_cf("proleptic_gregorian").unwrap(),
            Calendar::Standard
        );
        assert_eq!(Calendar::from_cf("noleap").unwrap(), Calendar::NoLeap);
        assert_eq!(Calendar::from_cf("365_day").unwrap(), Calendar::NoLeap);
        assert!(matches!(
            Calendar::from_cf("360_day"),
            Err(CalendarError::UnsupportedCalendar { .. })
        ));
    }

    #[test]
    fn standard_passes_through_leap_day() {
        let next = Calendar::Standard.next(date(2000, 2, 28)).unwrap();
        assert_eq!(next, date(2000, 2, 29));
        let after = Calendar::Standard.next(next).unwrap();
        assert_eq!(after, date(2000, 3, 1));
    }

    #[test]
    fn noleap_skips_leap_day() {
        let next = Calendar::NoLeap.next(date(2000, 2, 28)).unwrap();
        assert_eq!(next, date(2000, 3, 1));
    }

    #[test]
    fn noleap_year_wrap() {
        let next = Calendar::NoLeap.next(date(1999, 12, 31)).unwrap();
        assert_eq!(next, date(2000, 1, 1));
        assert_eq!(
            Calendar::NoLeap.add_days(date(1950, 1, 1), 365 * 10).unwrap(),
            date(1960, 1, 1)
        );
    }

    #[test]
    fn noleap_negative_offsets() {
        assert_eq!(
            Calendar::NoLeap.add_days(date(2000, 1, 1), -1).unwrap(),
            date(1999, 12, 31)
        );
    }

    #[test]
    fn standard_long_offset() {
        // 31 days to 1950-01-01, then 50 years with 12 leap days
        assert_eq!(
            Calendar::Standard
                .add_days(date(1949, 12, 1), 18293)
                .unwrap(),
            date(2000, 1, 1)
        );
    }

    #[test]
    fn standard_overflow() {
        let err = Calendar::Standard
            .add_days(date(2000, 1, 1), i64::MAX)
            .unwrap_err();
        assert!(matches!(err, CalendarError::Overflow { .. }));
    }
}
