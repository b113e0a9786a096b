use figment::Jail;
use sb_config::{SiteboardConfig, StoreBackend};

#[test]
fn env_selects_backend_and_credentials() {
    Jail::expect_with(|jail| {
        jail.set_env("SITEBOARD_STORE__BACKEND", "supabase");
        jail.set_env("SITEBOARD_SUPABASE__URL", "https://env.supabase.co");
        jail.set_env("SITEBOARD_SUPABASE__KEY", "env-key");

        let config = SiteboardConfig::load().map_err(|e| e.to_string())?;
        assert_eq!(config.store.backend, StoreBackend::Supabase);
        assert!(config.supabase.is_configured());
        assert!(config.validate().is_ok());
        Ok(())
    });
}

#[test]
fn env_list_values_parse() {
    Jail::expect_with(|jail| {
        jail.set_env("SITEBOARD_GENERAL__COMPANIES", "[Acme, Globex]");
        jail.set_env("SITEBOARD_CLIENT__CONFLICT_RETRIES", "5");

        let config = SiteboardConfig::load().map_err(|e| e.to_string())?;
        assert_eq!(config.general.companies, vec!["Acme", "Globex"]);
        assert_eq!(config.client.conflict_retries, 5);
        Ok(())
    });
}

#[test]
fn unknown_backend_is_an_error() {
    Jail::expect_with(|jail| {
        jail.set_env("SITEBOARD_STORE__BACKEND", "oracle");
        assert!(SiteboardConfig::load().is_err());
        Ok(())
    });
}
