use sb_config::SiteboardConfig;
use sb_core::entities::NewPersonnel;
use sb_core::enums::PersonnelStatus;
use sb_core::filters::PersonnelFilter;
use sb_core::updates::PersonnelUpdate;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::PersonnelCommands;
use crate::commands::shared::client;
use crate::commands::shared::parse::{parse_optional_enum, text_change};
use crate::output::output;

/// Handle `siteboard personnel`.
pub async fn handle(
    action: &PersonnelCommands,
    config: &SiteboardConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let api = client(config)?;
    match action {
        PersonnelCommands::List { status, role } => {
            let filter = PersonnelFilter {
                status: parse_optional_enum::<PersonnelStatus>(status.as_deref(), "status")?,
                role: role.clone(),
            };
            output(&api.list_personnel(&filter).await?, flags.format)
        }
        PersonnelCommands::Get { id } => output(&api.get_personnel(id).await?, flags.format),
        PersonnelCommands::Create {
            name,
            role,
            id,
            affiliation,
            phone,
            email,
            status,
            notes,
        } => {
            let person = NewPersonnel {
                id: id.clone(),
                name: name.clone(),
                role: role.clone(),
                affiliation: affiliation.clone(),
                phone: phone.clone(),
                email: email.clone(),
                status: parse_optional_enum::<PersonnelStatus>(status.as_deref(), "status")?
                    .unwrap_or_default(),
                notes: notes.clone(),
                ..NewPersonnel::default()
            };
            output(&api.create_personnel(&person).await?, flags.format)
        }
        PersonnelCommands::Update {
            id,
            name,
            role,
            affiliation,
            phone,
            email,
            status,
            notes,
        } => {
            let update = PersonnelUpdate {
                name: name.clone(),
                role: role.clone(),
                affiliation: text_change(affiliation.as_deref()),
                phone: text_change(phone.as_deref()),
                email: text_change(email.as_deref()),
                status: parse_optional_enum::<PersonnelStatus>(status.as_deref(), "status")?,
                notes: text_change(notes.as_deref()),
                ..PersonnelUpdate::default()
            };
            if update.changed_fields().is_empty() {
                anyhow::bail!("nothing to update: pass at least one field flag");
            }
            output(&api.update_personnel(id, &update).await?, flags.format)
        }
    }
}
