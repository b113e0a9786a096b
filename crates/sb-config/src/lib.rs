//! # sb-config
//!
//! Layered configuration loading for Siteboard using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`SITEBOARD_*` prefix, `__` as separator)
//! 2. Project-level `.siteboard/config.toml`
//! 3. User-level `~/.config/siteboard/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `SITEBOARD_SERVER__PORT` -> `server.port`,
//! `SITEBOARD_SUPABASE__KEY` -> `supabase.key`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use sb_config::SiteboardConfig;
//!
//! let config = SiteboardConfig::load_with_dotenv().expect("config");
//! if config.supabase.is_configured() {
//!     println!("Supabase URL: {}", config.supabase.url);
//! }
//! ```

mod client;
mod error;
mod general;
mod server;
mod store;
mod supabase;

pub use client::ClientConfig;
pub use error::ConfigError;
pub use general::GeneralConfig;
pub use server::ServerConfig;
pub use store::{StoreBackend, StoreConfig};
pub use supabase::SupabaseConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const ENV_PREFIX: &str = "SITEBOARD_";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SiteboardConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub supabase: SupabaseConfig,
    #[serde(default)]
    pub client: ClientConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl SiteboardConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env` support.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] when a source fails to parse.
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(ConfigError::from)
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] when a source fails to parse.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so callers can layer extra providers (e.g. CLI flags) on top.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from(".siteboard/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Check cross-section requirements for the selected backend.
    ///
    /// # Errors
    ///
    /// [`ConfigError::NotConfigured`] when the Supabase backend is selected
    /// without URL and key, [`ConfigError::InvalidValue`] for a zero limit.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store.backend == StoreBackend::Supabase && !self.supabase.is_configured() {
            return Err(ConfigError::NotConfigured {
                section: "supabase".to_string(),
            });
        }
        if self.general.default_limit == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "general.default_limit".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("siteboard").join("config.toml"))
    }

    /// Load `.env` from the workspace root, falling back to the current dir.
    fn load_dotenv_from_workspace() {
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            // crate -> crates/ -> workspace root
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }

        let _ = dotenvy::dotenv();
    }
}
