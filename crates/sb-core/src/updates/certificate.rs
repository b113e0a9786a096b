//! Certificate update builder.

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{changed_fields, nullable_date, nullable_string};
use crate::enums::CertificateStatus;

/// Editable certificate fields. The linked site is maintained by
/// assign / unassign.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CertificateUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "nullable_string"
    )]
    pub number: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "nullable_string"
    )]
    pub owner_phone: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "nullable_string"
    )]
    pub issuer: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "nullable_date"
    )]
    pub acquired_on: Option<Option<NaiveDate>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "nullable_date"
    )]
    pub valid_until: Option<Option<NaiveDate>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<CertificateStatus>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "nullable_string"
    )]
    pub notes: Option<Option<String>>,
}

impl CertificateUpdate {
    #[must_use]
    pub fn changed_fields(&self) -> Vec<&'static str> {
        changed_fields!(self;
            name, number, owner_name, owner_phone, issuer, acquired_on,
            valid_until, status, notes,
        )
    }
}

pub struct CertificateUpdateBuilder(CertificateUpdate);

impl CertificateUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(CertificateUpdate::default())
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.0.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn number(mut self, number: Option<String>) -> Self {
        self.0.number = Some(number);
        self
    }

    #[must_use]
    pub fn owner_name(mut self, owner_name: impl Into<String>) -> Self {
        self.0.owner_name = Some(owner_name.into());
        self
    }

    #[must_use]
    pub fn valid_until(mut self, date: Option<NaiveDate>) -> Self {
        self.0.valid_until = Some(date);
        self
    }

    #[must_use]
    pub fn status(mut self, status: CertificateStatus) -> Self {
        self.0.status = Some(status);
        self
    }

    #[must_use]
    pub fn notes(mut self, notes: Option<String>) -> Self {
        self.0.notes = Some(notes);
        self
    }

    #[must_use]
    pub fn build(self) -> CertificateUpdate {
        self.0
    }
}

impl Default for CertificateUpdateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
