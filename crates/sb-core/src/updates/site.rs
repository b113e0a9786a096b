//! Site update builder.

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{changed_fields, nullable_coordinate, nullable_date, nullable_string};
use crate::enums::SiteState;

/// Editable site fields.
///
/// Manager, certificate and assignment status are absent on purpose: they
/// only change through assign / unassign.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct SiteUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "nullable_string"
    )]
    pub owner_name: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "nullable_coordinate"
    )]
    pub latitude: Option<Option<f64>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "nullable_coordinate"
    )]
    pub longitude: Option<Option<f64>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "nullable_date"
    )]
    pub permit_date: Option<Option<NaiveDate>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "nullable_date"
    )]
    pub start_date: Option<Option<NaiveDate>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "nullable_date"
    )]
    pub completion_date: Option<Option<NaiveDate>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<SiteState>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "nullable_string"
    )]
    pub notes: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "nullable_string"
    )]
    pub completion_doc_url: Option<Option<String>>,
}

impl SiteUpdate {
    #[must_use]
    pub fn changed_fields(&self) -> Vec<&'static str> {
        changed_fields!(self;
            name, owner_name, company, address, latitude, longitude,
            permit_date, start_date, completion_date, state, notes,
            completion_doc_url,
        )
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changed_fields().is_empty()
    }
}

pub struct SiteUpdateBuilder(SiteUpdate);

impl SiteUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(SiteUpdate::default())
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.0.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn owner_name(mut self, owner_name: Option<String>) -> Self {
        self.0.owner_name = Some(owner_name);
        self
    }

    #[must_use]
    pub fn company(mut self, company: impl Into<String>) -> Self {
        self.0.company = Some(company.into());
        self
    }

    #[must_use]
    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.0.address = Some(address.into());
        self
    }

    #[must_use]
    pub fn coordinates(mut self, latitude: Option<f64>, longitude: Option<f64>) -> Self {
        self.0.latitude = Some(latitude);
        self.0.longitude = Some(longitude);
        self
    }

    #[must_use]
    pub fn permit_date(mut self, date: Option<NaiveDate>) -> Self {
        self.0.permit_date = Some(date);
        self
    }

    #[must_use]
    pub fn start_date(mut self, date: Option<NaiveDate>) -> Self {
        self.0.start_date = Some(date);
        self
    }

    #[must_use]
    pub fn completion_date(mut self, date: Option<NaiveDate>) -> Self {
        self.0.completion_date = Some(date);
        self
    }

    #[must_use]
    pub fn state(mut self, state: SiteState) -> Self {
        self.0.state = Some(state);
        self
    }

    #[must_use]
    pub fn notes(mut self, notes: Option<String>) -> Self {
        self.0.notes = Some(notes);
        self
    }

    #[must_use]
    pub fn completion_doc_url(mut self, url: Option<String>) -> Self {
        self.0.completion_doc_url = Some(url);
        self
    }

    #[must_use]
    pub fn build(self) -> SiteUpdate {
        self.0
    }
}

impl Default for SiteUpdateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn absent_keys_stay_untouched_and_null_clears() {
        let update: SiteUpdate =
            serde_json::from_str(r#"{"name": "Tower B", "notes": null, "permit_date": ""}"#)
                .unwrap();
        assert_eq!(update.name.as_deref(), Some("Tower B"));
        assert_eq!(update.notes, Some(None));
        assert_eq!(update.permit_date, Some(None));
        assert_eq!(update.owner_name, None);
        assert_eq!(update.changed_fields(), vec!["name", "permit_date", "notes"]);
    }

    #[test]
    fn serializes_only_changed_fields() {
        let update = SiteUpdateBuilder::new()
            .state(SiteState::UnderConstruction)
            .notes(None)
            .build();
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"state": "under_construction", "notes": null})
        );
    }

    #[test]
    fn string_coordinates_are_accepted() {
        let update: SiteUpdate =
            serde_json::from_str(r#"{"latitude": "37.5665", "longitude": ""}"#).unwrap();
        assert_eq!(update.latitude, Some(Some(37.5665)));
        assert_eq!(update.longitude, Some(None));
    }

    #[test]
    fn assignment_fields_are_ignored() {
        let update: SiteUpdate =
            serde_json::from_str(r#"{"manager_id": "PRS-1", "assignment_status": "assigned"}"#)
                .unwrap();
        assert!(update.is_empty());
    }
}
