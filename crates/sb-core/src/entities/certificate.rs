use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::site::non_blank;
use crate::dates;
use crate::enums::CertificateStatus;

/// A professional certificate that a site must hold while under management.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Certificate {
    pub id: String,
    /// Certificate type, e.g. "Architect (1st class)".
    pub name: String,
    pub number: Option<String>,
    pub owner_id: String,
    pub owner_name: String,
    pub owner_phone: Option<String>,
    pub issuer: Option<String>,
    #[serde(default, deserialize_with = "dates::deserialize_optional")]
    pub acquired_on: Option<NaiveDate>,
    #[serde(default, deserialize_with = "dates::deserialize_optional")]
    pub valid_until: Option<NaiveDate>,
    pub status: CertificateStatus,
    pub current_site_id: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Certificate {
    #[must_use]
    pub const fn is_available(&self) -> bool {
        matches!(self.status, CertificateStatus::Available)
    }
}

/// Fields accepted when registering a certificate. IDs are always generated.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NewCertificate {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default)]
    pub owner_name: String,
    #[serde(default)]
    pub owner_phone: Option<String>,
    #[serde(default)]
    pub issuer: Option<String>,
    #[serde(default, deserialize_with = "dates::deserialize_optional")]
    pub acquired_on: Option<NaiveDate>,
    #[serde(default, deserialize_with = "dates::deserialize_optional")]
    pub valid_until: Option<NaiveDate>,
    #[serde(default)]
    pub status: CertificateStatus,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewCertificate {
    #[must_use]
    pub fn into_certificate(self, id: String, owner_id: String, now: DateTime<Utc>) -> Certificate {
        Certificate {
            id,
            name: self.name.trim().to_string(),
            number: non_blank(self.number),
            owner_id,
            owner_name: self.owner_name.trim().to_string(),
            owner_phone: non_blank(self.owner_phone),
            issuer: non_blank(self.issuer),
            acquired_on: self.acquired_on,
            valid_until: self.valid_until,
            status: self.status,
            current_site_id: None,
            notes: non_blank(self.notes),
            created_at: now,
            updated_at: now,
        }
    }
}
