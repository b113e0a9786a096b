//! API client configuration.

use serde::{Deserialize, Serialize};

fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

const fn default_timeout_secs() -> u64 {
    15
}

const fn default_conflict_retries() -> u32 {
    3
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClientConfig {
    /// Server root; `/api` is appended per request.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// How many times the `*_latest` helpers reload and retry after a 409.
    #[serde(default = "default_conflict_retries")]
    pub conflict_retries: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            timeout_secs: default_timeout_secs(),
            conflict_retries: default_conflict_retries(),
        }
    }
}

impl ClientConfig {
    pub fn api_root(&self) -> String {
        format!("{}/api", self.base_url.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = ClientConfig::default();
        assert_eq!(config.api_root(), "http://127.0.0.1:5000/api");
        assert!(config.api_key.is_empty());
        assert_eq!(config.conflict_retries, 3);
    }
}
