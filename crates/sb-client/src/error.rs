use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure: connection refused, timeout, TLS.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with an error envelope or a non-2xx status.
    #[error("{code} ({status}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    /// 409: someone else changed the site. Reload and retry.
    #[error("conflict: {message}")]
    Conflict { message: String },

    /// The response body was not the expected JSON.
    #[error("parse error: {0}")]
    Parse(String),
}

impl ClientError {
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    /// The server's error code, when there is one.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Api { code, .. } => Some(code),
            Self::Conflict { .. } => Some("CONFLICT"),
            _ => None,
        }
    }
}
