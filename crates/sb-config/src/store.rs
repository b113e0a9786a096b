//! Storage backend selection.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which store the API server reads and writes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// libSQL file on disk.
    #[default]
    Local,
    /// In-memory libSQL, discarded on exit. Used as the offline mock.
    Memory,
    /// Remote Supabase (PostgREST).
    Supabase,
}

impl StoreBackend {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Memory => "memory",
            Self::Supabase => "supabase",
        }
    }
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_path() -> String {
    ".siteboard/siteboard.db".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,

    /// Database file for the `local` backend.
    #[serde(default = "default_path")]
    pub path: String,

    /// JSON fixtures loaded at startup when the store is empty.
    #[serde(default)]
    pub seed_file: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            path: default_path(),
            seed_file: String::new(),
        }
    }
}

impl StoreConfig {
    pub fn has_seed_file(&self) -> bool {
        !self.seed_file.is_empty()
    }
}
