pub mod parse;

use anyhow::Context;
use sb_client::SiteboardClient;
use sb_config::SiteboardConfig;

/// Build an API client from the `client` config section.
pub fn client(config: &SiteboardConfig) -> anyhow::Result<SiteboardClient> {
    SiteboardClient::new(&config.client).context("failed to build API client")
}
