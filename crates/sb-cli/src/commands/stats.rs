use sb_config::SiteboardConfig;

use crate::cli::GlobalFlags;
use crate::commands::shared::client;
use crate::output::output;

/// Handle `siteboard stats`.
pub async fn handle(config: &SiteboardConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let stats = client(config)?.stats().await?;
    output(&stats, flags.format)
}
