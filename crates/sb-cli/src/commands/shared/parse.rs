use chrono::NaiveDate;
use serde::de::DeserializeOwned;

/// Parse a snake_case enum value using serde-deserialization.
pub fn parse_enum<T>(raw: &str, field: &str) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    let normalized = raw.trim().replace('-', "_");
    let json = format!("\"{normalized}\"");
    serde_json::from_str(&json).map_err(|error| anyhow::anyhow!("invalid {field} '{raw}': {error}"))
}

pub fn parse_optional_enum<T>(raw: Option<&str>, field: &str) -> anyhow::Result<Option<T>>
where
    T: DeserializeOwned,
{
    raw.map(|value| parse_enum(value, field)).transpose()
}

/// Parse an optional `YYYY-MM-DD` flag. A blank value means no date.
pub fn parse_date(raw: Option<&str>, field: &str) -> anyhow::Result<Option<NaiveDate>> {
    match raw {
        None => Ok(None),
        Some(value) => sb_core::dates::parse_lenient(value)
            .map_err(|error| anyhow::anyhow!("invalid {field}: {error}")),
    }
}

/// Date flag for a partial update: absent leaves the field alone, blank clears it.
pub fn date_change(raw: Option<&str>, field: &str) -> anyhow::Result<Option<Option<NaiveDate>>> {
    match raw {
        None => Ok(None),
        Some(value) => parse_date(Some(value), field).map(Some),
    }
}

/// Text flag for a partial update: absent leaves the field alone, blank clears it.
pub fn text_change(raw: Option<&str>) -> Option<Option<String>> {
    raw.map(|value| {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}
