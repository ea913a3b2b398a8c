//! Date normalization
//!
//! Plan endpoints accept a handful of date formats from older clients; every
//! boundary normalizes to `YYYY-MM-DD` before anything touches the database.

use chrono::NaiveDate;
use thiserror::Error;

/// Formats accepted at API boundaries, tried in order.
const ACCEPTED_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d/%m/%Y", "%m-%d-%Y"];

/// Raised when a date string matches none of the accepted formats
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unsupported date format: {0}")]
pub struct DateParseError(pub String);

/// Normalize a date string to a `NaiveDate`.
///
/// Accepts `YYYY-MM-DD`, `DD/MM/YYYY` and `MM-DD-YYYY`.
pub fn normalize_date(date_str: &str) -> Result<NaiveDate, DateParseError> {
    let trimmed = date_str.trim();
    for fmt in ACCEPTED_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Ok(date);
        }
    }
    Err(DateParseError(date_str.to_string()))
}
