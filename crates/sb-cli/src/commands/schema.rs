use sb_core::entities::{Certificate, NewCertificate, NewPersonnel, NewSite, Personnel, Site};
use sb_core::responses::SiteDetail;
use sb_core::stats::DashboardStats;
use sb_core::updates::{CertificateUpdate, PersonnelUpdate, SiteUpdate};
use schemars::{Schema, schema_for};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::{SchemaArgs, SchemaType};
use crate::output::output;

/// Handle `siteboard schema`.
pub fn handle(args: &SchemaArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&schema(args.type_name), flags.format)
}

fn schema(type_name: SchemaType) -> Schema {
    match type_name {
        SchemaType::Site => schema_for!(Site),
        SchemaType::NewSite => schema_for!(NewSite),
        SchemaType::SiteUpdate => schema_for!(SiteUpdate),
        SchemaType::SiteDetail => schema_for!(SiteDetail),
        SchemaType::Personnel => schema_for!(Personnel),
        SchemaType::NewPersonnel => schema_for!(NewPersonnel),
        SchemaType::PersonnelUpdate => schema_for!(PersonnelUpdate),
        SchemaType::Certificate => schema_for!(Certificate),
        SchemaType::NewCertificate => schema_for!(NewCertificate),
        SchemaType::CertificateUpdate => schema_for!(CertificateUpdate),
        SchemaType::Stats => schema_for!(DashboardStats),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn site_schema_lists_version() {
        let value = serde_json::to_value(schema(SchemaType::Site)).unwrap();
        assert_eq!(value["title"], "Site");
        assert!(value["properties"]["version"].is_object());
        assert!(value["properties"]["assignment_status"].is_object());
    }

    #[test]
    fn update_schema_has_no_assignment_fields() {
        let value = serde_json::to_value(schema(SchemaType::SiteUpdate)).unwrap();
        let properties = value["properties"].as_object().unwrap();
        assert!(properties.contains_key("state"));
        assert!(!properties.contains_key("manager_id"));
        assert!(!properties.contains_key("certificate_id"));
    }
}
