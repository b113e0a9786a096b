use anyhow::Context;

use sb_config::SiteboardConfig;

use crate::cli::GlobalFlags;

/// Load `.env`, then the layered config, then apply command-line overrides.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<SiteboardConfig> {
    let mut config =
        SiteboardConfig::load_with_dotenv().context("failed to load siteboard configuration")?;
    apply_overrides(&mut config, flags);
    Ok(config)
}

fn apply_overrides(config: &mut SiteboardConfig, flags: &GlobalFlags) {
    if let Some(ref url) = flags.api_url {
        config.client.base_url.clone_from(url);
    }
    if let Some(ref key) = flags.api_key {
        config.client.api_key.clone_from(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;

    #[test]
    fn flags_override_client_section() {
        let mut config = SiteboardConfig::default();
        let flags = GlobalFlags {
            format: OutputFormat::Json,
            api_url: Some("http://10.0.0.5:8080".into()),
            api_key: None,
        };
        apply_overrides(&mut config, &flags);
        assert_eq!(config.client.api_root(), "http://10.0.0.5:8080/api");
        assert!(config.client.api_key.is_empty());
    }
}
