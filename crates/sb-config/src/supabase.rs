//! Supabase (PostgREST) configuration.

use serde::{Deserialize, Serialize};

const fn default_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SupabaseConfig {
    /// Project URL (e.g., `https://abcd.supabase.co`).
    #[serde(default)]
    pub url: String,

    /// Service-role or anon key, sent as both `apikey` and bearer token.
    #[serde(default)]
    pub key: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SupabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            key: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl SupabaseConfig {
    pub fn is_configured(&self) -> bool {
        !self.url.is_empty() && !self.key.is_empty()
    }

    /// PostgREST root: `{url}/rest/v1`.
    pub fn rest_url(&self) -> String {
        format!("{}/rest/v1", self.url.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_not_configured() {
        let config = SupabaseConfig::default();
        assert!(!config.is_configured());
        assert_eq!(config.timeout_secs, 10);
    }

    #[test]
    fn rest_url_strips_trailing_slash() {
        let config = SupabaseConfig {
            url: "https://abcd.supabase.co/".into(),
            key: "k".into(),
            ..SupabaseConfig::default()
        };
        assert!(config.is_configured());
        assert_eq!(config.rest_url(), "https://abcd.supabase.co/rest/v1");
    }
}
