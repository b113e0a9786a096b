//! Supabase store error types.

use sb_core::errors::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SupabaseError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// PostgREST returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api {
        status: u16,
        /// Error message or response body.
        message: String,
    },

    /// The API returned a 429 Too Many Requests response.
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// Failed to parse a response.
    #[error("parse error: {0}")]
    Parse(String),

    /// URL or key missing from the `[supabase]` config section.
    #[error("Supabase is not configured (set supabase.url and supabase.key)")]
    NotConfigured,

    /// A domain rule rejected the operation.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl SupabaseError {
    #[must_use]
    pub const fn as_core(&self) -> Option<&CoreError> {
        match self {
            Self::Core(e) => Some(e),
            _ => None,
        }
    }
}
