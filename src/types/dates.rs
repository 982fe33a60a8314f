use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::types::errors::ValueParseError;

/// Known timestamp layouts, tried in order.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
];

/// Known date-only layouts, tried in order. Day-first layouts outrank
/// month-first ones so that ambiguous values such as "03/04/2024" resolve
/// the same way on every run.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%d.%m.%Y",
    "%d/%m/%Y",
    "%m/%d/%Y",
    "%Y/%m/%d",
    "%d-%m-%Y",
];

/// Parses a date or timestamp from any of the known source layouts.
/// Date-only values resolve to midnight.
pub fn parse_date(raw: &str) -> Result<NaiveDateTime, ValueParseError> {
    let value = raw.trim();

    if value.is_empty() {
        return Err(ValueParseError::Empty);
    }

    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(parsed);
        }
    }

    for format in DATE_FORMATS {
        if let Ok(parsed) = NaiveDate::parse_from_str(value, format) {
            return Ok(parsed.and_time(NaiveTime::MIN));
        }
    }

    Err(ValueParseError::InvalidDate(raw.to_string()))
}
