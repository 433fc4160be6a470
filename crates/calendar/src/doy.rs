//! Day-of-year newtype on the fixed 365-slot axis.

use crate::error::CalendarError;

/// Number of day-of-year slots. Leap days fold onto slot 59.
pub const DAYS_PER_YEAR: usize = 365;

/// Day-of-year on the 365-slot axis (1..=365).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Doy(u16);

/// Number of days in each month of a non-leap year (index 0 unused).
pub(crate) const DAYS_PER_MONTH: [u8; 13] = [0, 31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Day-of-year on which each month starts (index 0 unused).
pub(crate) const MONTH_START_DOY: [u16; 13] =
    [0, 1, 32, 60, 91, 121, 152, 182, 213, 244, 274, 305, 335];

impl Doy {
    /// Creates a new `Doy` from a day-of-year value.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidDoy`] if `doy` is not in 1..=365.
    pub fn new(doy: u16) -> Result<Self, CalendarError> {
        if !(1..=DAYS_PER_YEAR as u16).contains(&doy) {
            return Err(CalendarError::InvalidDoy { doy });
        }
        Ok(Self(doy))
    }

    /// Creates a `Doy` from a 0-based slot index (0..=364).
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidDoy`] if `index >= 365`.
    pub fn from_index(index: usize) -> Result<Self, CalendarError> {
        if index >= DAYS_PER_YEAR {
            return Err(CalendarError::InvalidDoy {
                doy: u16::try_from(index + 1).unwrap_or(u16::MAX),
            });
        }
        Ok(Self(index as u16 + 1))
    }

    /// Slot for a month/day pair that the caller has already validated
    /// against the no-leap month lengths.
    pub(crate) fn from_valid_month_day(month: u8, day: u8) -> Self {
        Self(MONTH_START_DOY[month as usize] + day as u16 - 1)
    }

    /// Returns the inner day-of-year value (1..=365).
    pub fn get(self) -> u16 {
        self.0
    }

    /// Returns the 0-based index suitable for array indexing (0..=364).
    pub fn index(self) -> usize {
        (self.0 - 1) as usize
    }

    /// Returns the no-leap `(month, day)` pair for this slot.
    pub fn month_day(self) -> (u8, u8) {
        let month = (1..=12u8)
            .rev()
            .find(|&m| MONTH_START_DOY[m as usize] <= self.0)
            .unwrap_or(1);
        let day = (self.0 - MONTH_START_DOY[month as usize] + 1) as u8;
        (month, day)
    }

    /// Iterator over all 365 slots in order.
    pub fn all() -> impl Iterator<Item = Doy> {
        (1..=DAYS_PER_YEAR as u16).map(Doy)
    }
}
