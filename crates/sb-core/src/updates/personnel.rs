//! Personnel update builder.

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{changed_fields, nullable_date, nullable_string};
use crate::enums::PersonnelStatus;

/// Editable personnel fields. `current_site_count` is maintained by
/// assign / unassign and cannot be set directly.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct PersonnelUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "nullable_string"
    )]
    pub affiliation: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "nullable_string"
    )]
    pub phone: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "nullable_string"
    )]
    pub email: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "nullable_string"
    )]
    pub certificates_held: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<PersonnelStatus>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "nullable_string"
    )]
    pub notes: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "nullable_date"
    )]
    pub hired_on: Option<Option<NaiveDate>>,
}

impl PersonnelUpdate {
    #[must_use]
    pub fn changed_fields(&self) -> Vec<&'static str> {
        changed_fields!(self;
            name, role, affiliation, phone, email, certificates_held, status,
            notes, hired_on,
        )
    }
}

pub struct PersonnelUpdateBuilder(PersonnelUpdate);

impl PersonnelUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(PersonnelUpdate::default())
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.0.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.0.role = Some(role.into());
        self
    }

    #[must_use]
    pub fn affiliation(mut self, affiliation: Option<String>) -> Self {
        self.0.affiliation = Some(affiliation);
        self
    }

    #[must_use]
    pub fn phone(mut self, phone: Option<String>) -> Self {
        self.0.phone = Some(phone);
        self
    }

    #[must_use]
    pub fn email(mut self, email: Option<String>) -> Self {
        self.0.email = Some(email);
        self
    }

    #[must_use]
    pub fn status(mut self, status: PersonnelStatus) -> Self {
        self.0.status = Some(status);
        self
    }

    #[must_use]
    pub fn notes(mut self, notes: Option<String>) -> Self {
        self.0.notes = Some(notes);
        self
    }

    #[must_use]
    pub fn build(self) -> PersonnelUpdate {
        self.0
    }
}

impl Default for PersonnelUpdateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
