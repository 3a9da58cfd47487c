//! Reading "today" once, in the salon's timezone.

use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;

use crate::error::{EngineError, Result};

/// Parse an IANA timezone name such as `"Europe/Berlin"`.
///
/// # Errors
/// Returns `EngineError::InvalidTimezone` if the name is not a known zone.
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse()
        .map_err(|_| EngineError::InvalidTimezone(name.to_string()))
}

/// The current calendar date in `tz`.
///
/// This is the only wall-clock read in the crate. Call it once per request and
/// pass the result to the availability functions.
pub fn today_in(tz: Tz) -> NaiveDate {
    Utc::now().with_timezone(&tz).date_naive()
}
