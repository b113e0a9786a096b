use sb_config::SiteboardConfig;
use sb_core::entities::NewCertificate;
use sb_core::enums::CertificateStatus;
use sb_core::filters::CertificateFilter;
use sb_core::updates::CertificateUpdate;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::CertCommands;
use crate::commands::shared::client;
use crate::commands::shared::parse::{date_change, parse_date, parse_optional_enum, text_change};
use crate::output::output;

/// Handle `siteboard cert`.
pub async fn handle(
    action: &CertCommands,
    config: &SiteboardConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let api = client(config)?;
    match action {
        CertCommands::List { available } => {
            let filter = CertificateFilter {
                available: *available,
            };
            output(&api.list_certificates(&filter).await?, flags.format)
        }
        CertCommands::Get { id } => output(&api.get_certificate(id).await?, flags.format),
        CertCommands::Create {
            name,
            owner,
            number,
            owner_phone,
            issuer,
            acquired_on,
            valid_until,
            notes,
        } => {
            let certificate = NewCertificate {
                name: name.clone(),
                number: number.clone(),
                owner_name: owner.clone(),
                owner_phone: owner_phone.clone(),
                issuer: issuer.clone(),
                acquired_on: parse_date(acquired_on.as_deref(), "acquired_on")?,
                valid_until: parse_date(valid_until.as_deref(), "valid_until")?,
                status: CertificateStatus::Available,
                notes: notes.clone(),
            };
            output(&api.create_certificate(&certificate).await?, flags.format)
        }
        CertCommands::Update {
            id,
            name,
            owner,
            number,
            valid_until,
            status,
            notes,
        } => {
            let update = CertificateUpdate {
                name: name.clone(),
                owner_name: owner.clone(),
                number: text_change(number.as_deref()),
                valid_until: date_change(valid_until.as_deref(), "valid_until")?,
                status: parse_optional_enum::<CertificateStatus>(status.as_deref(), "status")?,
                notes: text_change(notes.as_deref()),
                ..CertificateUpdate::default()
            };
            if update.changed_fields().is_empty() {
                anyhow::bail!("nothing to update: pass at least one field flag");
            }
            output(&api.update_certificate(id, &update).await?, flags.format)
        }
    }
}
