//! Integration tests for TOML configuration loading.
//!
//! Uses figment::Jail for sandboxed files and env vars.

use figment::{
    Figment, Jail,
    providers::{Env, Format, Serialized, Toml},
};
use pretty_assertions::assert_eq;
use sb_config::{SiteboardConfig, StoreBackend};

#[test]
fn loads_server_and_store_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[server]
host = "0.0.0.0"
port = 8080
allowed_origins = ["http://localhost:3000"]
api_key = "secret"

[store]
backend = "memory"
seed_file = "fixtures/sites.json"
"#,
        )?;

        let config: SiteboardConfig = Figment::from(Serialized::defaults(SiteboardConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.server.bind_addr(), "0.0.0.0:8080");
        assert_eq!(config.server.allowed_origins, vec!["http://localhost:3000"]);
        assert!(config.server.requires_api_key());
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert!(config.store.has_seed_file());
        Ok(())
    });
}

#[test]
fn partial_sections_keep_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[general]
require_version = true
"#,
        )?;

        let config: SiteboardConfig = Figment::from(Serialized::defaults(SiteboardConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert!(config.general.require_version);
        assert_eq!(config.general.default_limit, None);
        assert_eq!(config.general.companies.len(), 2);
        assert_eq!(config.server.port, 5000);
        Ok(())
    });
}

#[test]
fn project_local_file_is_picked_up() {
    Jail::expect_with(|jail| {
        jail.create_dir(".siteboard")?;
        jail.create_file(
            ".siteboard/config.toml",
            r#"
[supabase]
url = "https://abcd.supabase.co"
key = "anon-key"
"#,
        )?;

        let config = SiteboardConfig::load().map_err(|e| e.to_string())?;
        assert!(config.supabase.is_configured());
        assert_eq!(config.supabase.rest_url(), "https://abcd.supabase.co/rest/v1");
        Ok(())
    });
}

#[test]
fn env_beats_toml() {
    Jail::expect_with(|jail| {
        jail.create_file("config.toml", "[server]\nport = 7000\n")?;
        jail.set_env("SITEBOARD_SERVER__PORT", "9000");

        let config: SiteboardConfig = Figment::from(Serialized::defaults(SiteboardConfig::default()))
            .merge(Toml::file("config.toml"))
            .merge(Env::prefixed("SITEBOARD_").split("__"))
            .extract()?;

        assert_eq!(config.server.port, 9000);
        Ok(())
    });
}
