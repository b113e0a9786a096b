use sb_config::SiteboardConfig;
use sb_core::entities::NewSite;
use sb_core::enums::{AssignmentStatus, SiteState};
use sb_core::filters::SiteFilter;
use sb_core::updates::SiteUpdate;
use serde_json::json;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::SiteCommands;
use crate::commands::shared::client;
use crate::commands::shared::parse::{date_change, parse_date, parse_optional_enum, text_change};
use crate::output::output;

/// Handle `siteboard site`.
pub async fn handle(
    action: &SiteCommands,
    config: &SiteboardConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let api = client(config)?;
    match action {
        SiteCommands::List {
            company,
            status,
            state,
            limit,
            offset,
        } => {
            let filter = SiteFilter {
                company: company.clone(),
                assignment_status: parse_optional_enum::<AssignmentStatus>(
                    status.as_deref(),
                    "status",
                )?,
                state: parse_optional_enum::<SiteState>(state.as_deref(), "state")?,
                limit: *limit,
                offset: *offset,
            };
            let page = api.list_sites(&filter).await?;
            output(&page, flags.format)
        }
        SiteCommands::Search { query } => {
            let sites = api.search_sites(query).await?;
            output(&json!({ "query": query, "count": sites.len(), "sites": sites }), flags.format)
        }
        SiteCommands::Get { id } => output(&api.get_site(id).await?, flags.format),
        SiteCommands::Create {
            name,
            company,
            address,
            id,
            owner,
            latitude,
            longitude,
            permit_date,
            start_date,
            completion_date,
            state,
            notes,
        } => {
            let site = NewSite {
                id: id.clone(),
                name: name.clone(),
                owner_name: owner.clone(),
                company: company.clone(),
                address: address.clone(),
                latitude: *latitude,
                longitude: *longitude,
                permit_date: parse_date(permit_date.as_deref(), "permit_date")?,
                start_date: parse_date(start_date.as_deref(), "start_date")?,
                completion_date: parse_date(completion_date.as_deref(), "completion_date")?,
                state: parse_optional_enum::<SiteState>(state.as_deref(), "state")?
                    .unwrap_or_default(),
                notes: notes.clone(),
                completion_doc_url: None,
            };
            output(&api.create_site(&site).await?, flags.format)
        }
        SiteCommands::Update {
            id,
            name,
            company,
            address,
            owner,
            permit_date,
            start_date,
            completion_date,
            state,
            notes,
            completion_doc_url,
            version,
        } => {
            let update = SiteUpdate {
                name: name.clone(),
                owner_name: text_change(owner.as_deref()),
                company: company.clone(),
                address: address.clone(),
                latitude: None,
                longitude: None,
                permit_date: date_change(permit_date.as_deref(), "permit_date")?,
                start_date: date_change(start_date.as_deref(), "start_date")?,
                completion_date: date_change(completion_date.as_deref(), "completion_date")?,
                state: parse_optional_enum::<SiteState>(state.as_deref(), "state")?,
                notes: text_change(notes.as_deref()),
                completion_doc_url: text_change(completion_doc_url.as_deref()),
            };
            if update.is_empty() {
                anyhow::bail!("nothing to update: pass at least one field flag");
            }
            let ack = match version {
                Some(version) => api.update_site(id, &update, Some(*version)).await?,
                None => api.update_site_latest(id, &update).await?,
            };
            output(&ack, flags.format)
        }
        SiteCommands::Assign {
            id,
            manager,
            certificate,
            version,
        } => {
            let ack = match version {
                Some(version) => {
                    api.assign_site(id, manager, certificate, Some(*version))
                        .await?
                }
                None => api.assign_latest(id, manager, certificate).await?,
            };
            output(&ack, flags.format)
        }
        SiteCommands::Unassign { id, version } => {
            let ack = match version {
                Some(version) => api.unassign_site(id, Some(*version)).await?,
                None => api.unassign_latest(id).await?,
            };
            output(&ack, flags.format)
        }
    }
}
