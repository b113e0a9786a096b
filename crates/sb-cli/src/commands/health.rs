use sb_config::SiteboardConfig;

use crate::cli::GlobalFlags;
use crate::commands::shared::client;
use crate::output::output;

/// Handle `siteboard health`.
pub async fn handle(config: &SiteboardConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let health = client(config)?.health().await?;
    output(&health, flags.format)
}
