//! # climdex-calendar
//!
//! Date arithmetic for daily climate model output.
//!
//! Model files use either the proleptic Gregorian calendar or the 365-day
//! no-leap calendar. Both are mapped onto a fixed 365-slot day-of-year so
//! that per-calendar-day statistics line up across years.
//!
//! ## Leap-day policy
//!
//! 29 February shares day-of-year 59 with 28 February. Every later day in a
//! leap year keeps its no-leap position, so 1 March is always day 60 and
//! 31 December is always day 365.
//!
//! ```mermaid
//! graph LR
//!     A["DailyDate"] -->|".doy()"| B["Doy (1..=365)"]
//!     B -->|"doy_window()"| C["circular window of Doy"]
//!     D["Calendar"] -->|".add_days()"| A
//!     E["&[DailyDate]"] -->|"year_ranges()"| F["(year, Range)"]
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `doy` | Day-of-year newtype |
//! | `date` | Daily date with leap-day aware day-of-year |
//! | `calendar` | CF calendar names and day-offset arithmetic |
//! | `sequence` | Contiguous date sequences |
//! | `window` | Circular day-of-year windows |
//! | `years` | Calendar-year grouping of a date axis |
//! | `error` | Error types |

mod calendar;
mod date;
mod doy;
mod error;
mod sequence;
mod window;
mod years;

pub use calendar::Calendar;
pub use date::{DailyDate, is_leap_year};
pub use doy::{DAYS_PER_YEAR, Doy};
pub use error::CalendarError;
pub use sequence::daily_sequence;
pub use window::doy_window;
pub use years::year_ranges;
