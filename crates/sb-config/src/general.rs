//! General application configuration.

use serde::{Deserialize, Serialize};

fn default_companies() -> Vec<String> {
    vec!["더존종합건설".to_string(), "더존하우징".to_string()]
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Allowed values for a site's company. Empty accepts any company.
    #[serde(default = "default_companies")]
    pub companies: Vec<String>,

    /// Reject site mutations that carry no version token (HTTP 428).
    #[serde(default)]
    pub require_version: bool,

    /// Page size for site listings when the caller sends no `limit`.
    /// Unset returns every matching site.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_limit: Option<u32>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            companies: default_companies(),
            require_version: false,
            default_limit: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = GeneralConfig::default();
        assert_eq!(config.companies.len(), 2);
        assert!(!config.require_version);
        assert_eq!(config.default_limit, None);
    }
}
