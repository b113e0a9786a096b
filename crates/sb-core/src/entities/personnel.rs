use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::site::non_blank;
use crate::dates;
use crate::enums::PersonnelStatus;

/// A site manager or other staff member who can be assigned to sites.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Personnel {
    pub id: String,
    pub name: String,
    pub role: String,
    pub affiliation: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    /// Free-text list of held certificates.
    pub certificates_held: Option<String>,
    pub status: PersonnelStatus,
    /// Number of sites this person currently manages.
    pub current_site_count: u32,
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "dates::deserialize_optional")]
    pub hired_on: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted when registering personnel.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NewPersonnel {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub affiliation: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub certificates_held: Option<String>,
    #[serde(default)]
    pub status: PersonnelStatus,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "dates::deserialize_optional")]
    pub hired_on: Option<NaiveDate>,
}

impl NewPersonnel {
    #[must_use]
    pub fn into_personnel(self, id: String, now: DateTime<Utc>) -> Personnel {
        Personnel {
            id,
            name: self.name.trim().to_string(),
            role: self.role.trim().to_string(),
            affiliation: non_blank(self.affiliation),
            phone: non_blank(self.phone),
            email: non_blank(self.email),
            certificates_held: non_blank(self.certificates_held),
            status: self.status,
            current_site_count: 0,
            notes: non_blank(self.notes),
            hired_on: self.hired_on,
            created_at: now,
            updated_at: now,
        }
    }

    #[must_use]
    pub fn requested_id(&self) -> Option<&str> {
        self.id.as_deref().map(str::trim).filter(|id| !id.is_empty())
    }
}
