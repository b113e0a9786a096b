use anyhow::Context;
use sb_config::{SiteboardConfig, StoreBackend};

use crate::cli::root_commands::{BackendArg, ServeArgs};

/// Handle `siteboard serve`.
pub async fn handle(args: &ServeArgs, mut config: SiteboardConfig) -> anyhow::Result<()> {
    apply_overrides(args, &mut config);
    config.validate().context("invalid server configuration")?;
    sb_server::start_server(&config)
        .await
        .with_context(|| format!("failed to serve on {}", config.server.bind_addr()))
}

fn apply_overrides(args: &ServeArgs, config: &mut SiteboardConfig) {
    if let Some(ref host) = args.host {
        config.server.host.clone_from(host);
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(backend) = args.backend {
        config.store.backend = match backend {
            BackendArg::Local => StoreBackend::Local,
            BackendArg::Memory => StoreBackend::Memory,
            BackendArg::Supabase => StoreBackend::Supabase,
        };
    }
    if let Some(ref db) = args.db {
        config.store.path.clone_from(db);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_server_and_store() {
        let mut config = SiteboardConfig::default();
        let args = ServeArgs {
            host: Some("0.0.0.0".into()),
            port: Some(9100),
            backend: Some(BackendArg::Memory),
            db: None,
        };
        apply_overrides(&args, &mut config);
        assert_eq!(config.server.bind_addr(), "0.0.0.0:9100");
        assert_eq!(config.store.backend, StoreBackend::Memory);
    }
}
