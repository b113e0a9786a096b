//! Row-to-entity parsing helpers.
//!
//! Every repo converts `libsql::Row` (column-indexed) into typed entity structs.
//! These helpers isolate the parsing and handle both timestamp formats
//! (`SQLite`'s `datetime('now')` and Rust's `to_rfc3339()`).

use chrono::{DateTime, NaiveDate, Utc};

use sb_core::dates;

use crate::error::DatabaseError;

/// Parse a required TEXT column as `DateTime<Utc>`.
///
/// Handles both RFC 3339 (`"2026-02-09T14:30:00+00:00"`) and `SQLite`'s default
/// format (`"2026-02-09 14:30:00"`).
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string cannot be parsed as either format.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, DatabaseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| DatabaseError::Query(format!("Failed to parse datetime '{s}': {e}")))
}

/// Parse a TEXT column into a serde-deserializable enum.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string does not match any variant.
pub fn parse_enum<T: serde::de::DeserializeOwned>(s: &str) -> Result<T, DatabaseError> {
    serde_json::from_value(serde_json::Value::String(s.to_string()))
        .map_err(|e| DatabaseError::Query(format!("Failed to parse enum from '{s}': {e}")))
}

/// Read a nullable TEXT column. Returns `None` for both SQL NULL and empty string.
///
/// `row.get::<String>(idx)` on a NULL column returns an error, not `""`.
///
/// # Errors
///
/// Returns `DatabaseError` if the column read fails.
pub fn get_opt_string(row: &libsql::Row, idx: i32) -> Result<Option<String>, DatabaseError> {
    match row.get::<Option<String>>(idx)? {
        Some(s) if s.is_empty() => Ok(None),
        other => Ok(other),
    }
}

/// Read a nullable `YYYY-MM-DD` column.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if a non-empty value is not a date.
pub fn get_opt_date(row: &libsql::Row, idx: i32) -> Result<Option<NaiveDate>, DatabaseError> {
    match get_opt_string(row, idx)? {
        Some(s) => dates::parse_lenient(&s).map_err(DatabaseError::Query),
        None => Ok(None),
    }
}

/// Read a non-negative INTEGER column as `u32`.
///
/// # Errors
///
/// Returns `DatabaseError::InvalidState` for negative or oversized values.
pub fn get_u32(row: &libsql::Row, idx: i32) -> Result<u32, DatabaseError> {
    let raw = row.get::<i64>(idx)?;
    u32::try_from(raw)
        .map_err(|_| DatabaseError::InvalidState(format!("column {idx} out of range: {raw}")))
}

/// Bind an optional date as TEXT or NULL.
#[must_use]
pub fn date_param(date: Option<NaiveDate>) -> libsql::Value {
    date.map_or(libsql::Value::Null, |d| dates::format(d).into())
}

/// Bind an optional string as TEXT or NULL.
#[must_use]
pub fn opt_text(value: Option<&str>) -> libsql::Value {
    value.map_or(libsql::Value::Null, Into::into)
}

/// Bind an optional float as REAL or NULL.
#[must_use]
pub fn opt_real(value: Option<f64>) -> libsql::Value {
    value.map_or(libsql::Value::Null, libsql::Value::Real)
}

/// Unicode case-insensitive substring test. SQLite's `lower()` and `LIKE`
/// only fold ASCII, so matching happens here instead.
#[must_use]
pub fn contains_folded(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_timestamp_formats() {
        let a = parse_datetime("2026-02-09T14:30:00+00:00").unwrap();
        let b = parse_datetime("2026-02-09 14:30:00").unwrap();
        assert_eq!(a, b);
        assert!(parse_datetime("yesterday").is_err());
    }

    #[test]
    fn folded_match_is_unicode_aware_and_literal() {
        assert!(contains_folded("Riverside TOWER", "tower"));
        assert!(contains_folded("ÉCOLE Saint-Denis", "école"));
        assert!(contains_folded("50%_off plaza", "50%_off"));
        assert!(!contains_folded("50 percent off", "50%_off"));
        assert!(contains_folded("서울 강남구", "강남"));
    }

    #[test]
    fn enum_parse_errors_are_query_errors() {
        let err = parse_enum::<sb_core::enums::SiteState>("demolished").unwrap_err();
        assert!(matches!(err, DatabaseError::Query(_)));
    }
}
