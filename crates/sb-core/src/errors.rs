//! Domain errors shared by every Siteboard crate.
//!
//! Storage-specific errors (`DatabaseError`, `SupabaseError`) wrap `CoreError`
//! so the server can map a single type onto HTTP status codes.

use thiserror::Error;

use crate::enums::EntityType;

#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity lookup returned no result.
    #[error("{entity} {id} not found")]
    NotFound { entity: EntityType, id: String },

    /// Data failed validation. Multiple problems are joined with `"; "`.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A required field was absent or blank.
    #[error("Missing field: {0}")]
    MissingField(String),

    #[error("Certificate {id} is not available")]
    CertificateUnavailable { id: String },

    #[error("Site {site_id} has no manager assigned")]
    NotAssigned { site_id: String },

    /// The caller's version token no longer matches the stored record.
    #[error(
        "Site {id} was modified by someone else (current version {current}, expected {expected}); reload and try again"
    )]
    VersionConflict {
        id: String,
        current: i64,
        expected: i64,
    },

    #[error("{entity} {id} already exists")]
    Duplicate { entity: EntityType, id: String },

    #[error("Invalid version token: {0}")]
    InvalidVersionToken(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CoreError {
    #[must_use]
    pub fn not_found(entity: EntityType, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Whether retrying with a freshly loaded version could succeed.
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::VersionConflict { .. })
    }
}
