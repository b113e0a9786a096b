use std::path::Path;

use anyhow::Context;
use sb_config::SiteboardConfig;
use sb_db::repos::seed::SeedData;
use sb_db::service::SiteService;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SeedArgs;
use crate::output::output;

/// Handle `siteboard seed`: load a fixture file straight into the local store.
pub async fn handle(
    args: &SeedArgs,
    config: &SiteboardConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let path = args.db.as_deref().unwrap_or(&config.store.path);
    let data = SeedData::from_file(Path::new(&args.file))?;
    let service = SiteService::new_local(path)
        .await
        .with_context(|| format!("failed to open local store at {path}"))?;
    let report = service.seed(&data).await?;
    tracing::info!(
        file = %args.file,
        sites = report.sites,
        personnel = report.personnel,
        certificates = report.certificates,
        skipped = report.skipped,
        "seed complete"
    );
    output(&report, flags.format)
}
