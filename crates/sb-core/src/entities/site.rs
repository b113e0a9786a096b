use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

use crate::dates;
use crate::enums::{AssignmentStatus, SiteState};

/// A construction project tracked on the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Site {
    pub id: String,
    pub name: String,
    /// Building owner (client) name.
    pub owner_name: Option<String>,
    pub company: String,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(default, deserialize_with = "dates::deserialize_optional")]
    pub permit_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "dates::deserialize_optional")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "dates::deserialize_optional")]
    pub completion_date: Option<NaiveDate>,
    pub state: SiteState,
    pub notes: Option<String>,
    pub manager_id: Option<String>,
    pub certificate_id: Option<String>,
    /// Link to the scanned completion certificate.
    pub completion_doc_url: Option<String>,
    pub assignment_status: AssignmentStatus,
    /// Optimistic-concurrency token, bumped on every mutation.
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Site {
    #[must_use]
    pub const fn is_assigned(&self) -> bool {
        matches!(self.assignment_status, AssignmentStatus::Assigned)
    }
}

/// Fields accepted when registering a site.
///
/// Required fields default to empty so that a missing field surfaces as a
/// validation error rather than a deserialization failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct NewSite {
    /// Caller-chosen ID; generated when absent or blank.
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub owner_name: Option<String>,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub address: String,
    #[serde(default, deserialize_with = "deserialize_coordinate")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_coordinate")]
    pub longitude: Option<f64>,
    #[serde(default, deserialize_with = "dates::deserialize_optional")]
    pub permit_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "dates::deserialize_optional")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "dates::deserialize_optional")]
    pub completion_date: Option<NaiveDate>,
    #[serde(default)]
    pub state: SiteState,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub completion_doc_url: Option<String>,
}

impl NewSite {
    /// Materialize the record a store will insert.
    #[must_use]
    pub fn into_site(self, id: String, now: DateTime<Utc>) -> Site {
        Site {
            id,
            name: self.name.trim().to_string(),
            owner_name: non_blank(self.owner_name),
            company: self.company.trim().to_string(),
            address: self.address.trim().to_string(),
            latitude: self.latitude,
            longitude: self.longitude,
            permit_date: self.permit_date,
            start_date: self.start_date,
            completion_date: self.completion_date,
            state: self.state,
            notes: non_blank(self.notes),
            manager_id: None,
            certificate_id: None,
            completion_doc_url: non_blank(self.completion_doc_url),
            assignment_status: AssignmentStatus::Unassigned,
            version: 1,
            created_at: now,
            updated_at: now,
        }
    }

    /// The caller-supplied ID, if it is not blank.
    #[must_use]
    pub fn requested_id(&self) -> Option<&str> {
        self.id.as_deref().map(str::trim).filter(|id| !id.is_empty())
    }
}

pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Accept coordinates as numbers, numeric strings, blank strings, or null.
///
/// # Errors
///
/// Fails deserialization on a non-numeric string.
pub fn deserialize_coordinate<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Number(n)) => Ok(Some(n)),
        Some(Raw::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(Raw::Text(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("'{s}' is not a coordinate"))),
    }
}
