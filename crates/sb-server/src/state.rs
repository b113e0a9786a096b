use std::sync::Arc;

use sb_config::SiteboardConfig;

use crate::store::Backend;

/// Request-independent settings the handlers consult.
#[derive(Debug, Clone)]
pub struct Settings {
    pub companies: Vec<String>,
    pub require_version: bool,
    pub default_limit: Option<u32>,
    /// Empty disables API-key checks.
    pub api_key: String,
    pub allowed_origins: Vec<String>,
}

impl Settings {
    #[must_use]
    pub fn from_config(config: &SiteboardConfig) -> Self {
        Self {
            companies: config.general.companies.clone(),
            require_version: config.general.require_version,
            default_limit: config.general.default_limit,
            api_key: config.server.api_key.clone(),
            allowed_origins: config.server.allowed_origins.clone(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_config(&SiteboardConfig::default())
    }
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Backend>,
    pub settings: Arc<Settings>,
}

impl AppState {
    #[must_use]
    pub fn new(store: Backend, settings: Settings) -> Self {
        Self {
            store: Arc::new(store),
            settings: Arc::new(settings),
        }
    }

    /// Connect the configured backend and capture settings.
    pub async fn from_config(config: &SiteboardConfig) -> Self {
        let store = Backend::connect(config).await;
        Self::new(store, Settings::from_config(config))
    }
}
