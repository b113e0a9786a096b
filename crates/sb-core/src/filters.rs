//! List filters shared by both stores.
//!
//! The local store pushes filters into SQL; `matches()` is the in-memory
//! equivalent used by tests and by callers filtering already-loaded rows.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{Certificate, Personnel, Site};
use crate::enums::{AssignmentStatus, CertificateStatus, PersonnelStatus, SiteState};

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SiteFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    /// Assignment status (`?status=` on the wire).
    #[serde(default, rename = "status", skip_serializing_if = "Option::is_none")]
    pub assignment_status: Option<AssignmentStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<SiteState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

impl SiteFilter {
    /// Whether a site passes the company / status / state criteria.
    /// Paging is not considered.
    #[must_use]
    pub fn matches(&self, site: &Site) -> bool {
        self.company
            .as_deref()
            .is_none_or(|company| site.company == company)
            && self
                .assignment_status
                .is_none_or(|status| site.assignment_status == status)
            && self.state.is_none_or(|state| site.state == state)
    }

    /// Offset into the full result set, defaulting to zero.
    #[must_use]
    pub fn offset(&self) -> u32 {
        self.offset.unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct PersonnelFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<PersonnelStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl PersonnelFilter {
    #[must_use]
    pub fn matches(&self, person: &Personnel) -> bool {
        self.status.is_none_or(|status| person.status == status)
            && self.role.as_deref().is_none_or(|role| person.role == role)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CertificateFilter {
    /// `Some(true)` keeps only available certificates, `Some(false)` only
    /// the rest.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available: Option<bool>,
}

impl CertificateFilter {
    #[must_use]
    pub fn matches(&self, certificate: &Certificate) -> bool {
        self.available.is_none_or(|available| {
            (certificate.status == CertificateStatus::Available) == available
        })
    }
}

/// One page of a filtered listing.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Matching rows before limit/offset were applied.
    pub total: u64,
}
