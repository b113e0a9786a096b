//! Partial-update types for entity mutations.
//!
//! Each update struct has `Option` fields; only `Some` fields are written.
//! Nullable columns use `Option<Option<T>>` so that an explicit JSON `null`
//! clears the column while an absent key leaves it untouched. The serialized
//! form (changed fields only) doubles as the PostgREST `PATCH` body.

mod certificate;
mod personnel;
mod site;

pub use certificate::{CertificateUpdate, CertificateUpdateBuilder};
pub use personnel::{PersonnelUpdate, PersonnelUpdateBuilder};
pub use site::{SiteUpdate, SiteUpdateBuilder};

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

/// Present-but-null becomes `Some(None)`; blank strings clear the column too.
pub(crate) fn nullable_string<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(Some(
        value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty()),
    ))
}

pub(crate) fn nullable_date<'de, D>(deserializer: D) -> Result<Option<Option<NaiveDate>>, D::Error>
where
    D: Deserializer<'de>,
{
    crate::dates::deserialize_optional(deserializer).map(Some)
}

pub(crate) fn nullable_coordinate<'de, D>(deserializer: D) -> Result<Option<Option<f64>>, D::Error>
where
    D: Deserializer<'de>,
{
    crate::entities::deserialize_coordinate(deserializer).map(Some)
}

/// Collect the names of the `Some` fields, in declaration order.
macro_rules! changed_fields {
    ($update:expr; $($field:ident),+ $(,)?) => {{
        let mut fields: Vec<&'static str> = Vec::new();
        $(
            if $update.$field.is_some() {
                fields.push(stringify!($field));
            }
        )+
        fields
    }};
}

pub(crate) use changed_fields;
