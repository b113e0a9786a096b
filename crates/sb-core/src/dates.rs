//! Lenient calendar-date parsing.
//!
//! Dates arrive from forms and spreadsheets as `YYYY-MM-DD`, sometimes with a
//! time suffix (`2025-03-01T09:00:00`) and sometimes as an empty string. Only
//! the first ten characters are significant; blank means "no date".

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

/// Storage and wire format for dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a date, ignoring anything after the first ten characters.
///
/// # Errors
///
/// Returns a human-readable message if the prefix is not a valid `YYYY-MM-DD` date.
pub fn parse_lenient(raw: &str) -> Result<Option<NaiveDate>, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let prefix = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(prefix, DATE_FORMAT)
        .map(Some)
        .map_err(|_| format!("'{raw}' is not a YYYY-MM-DD date"))
}

/// Serde adapter for `Option<NaiveDate>` fields that accepts blank strings.
///
/// # Errors
///
/// Fails deserialization when a non-blank value is not a valid date.
pub fn deserialize_optional<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(raw) => parse_lenient(&raw).map_err(serde::de::Error::custom),
    }
}

/// Format a date for storage.
#[must_use]
pub fn format(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
