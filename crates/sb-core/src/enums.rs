//! Status enums and entity types for Siteboard.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`;
//! `as_str()` returns the same string, used for SQL storage and query filters.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// SiteState
// ---------------------------------------------------------------------------

/// Construction progress of a site.
///
/// ```text
/// permitted → scheduled → under_construction → completed
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SiteState {
    /// Building permit granted.
    #[default]
    Permitted,
    /// Groundbreaking scheduled.
    Scheduled,
    UnderConstruction,
    Completed,
}

impl SiteState {
    pub const ALL: [Self; 4] = [
        Self::Permitted,
        Self::Scheduled,
        Self::UnderConstruction,
        Self::Completed,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Permitted => "permitted",
            Self::Scheduled => "scheduled",
            Self::UnderConstruction => "under_construction",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for SiteState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AssignmentStatus
// ---------------------------------------------------------------------------

/// Whether a site has a manager and certificate linked to it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    #[default]
    Unassigned,
    Assigned,
}

impl AssignmentStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unassigned => "unassigned",
            Self::Assigned => "assigned",
        }
    }
}

impl fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// PersonnelStatus
// ---------------------------------------------------------------------------

/// Availability of a person for site assignment.
///
/// ```text
/// available ⇄ deployed        (driven by assign / unassign)
/// on_leave, retired           (set manually, block new assignments)
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PersonnelStatus {
    #[default]
    Available,
    Deployed,
    OnLeave,
    Retired,
}

impl PersonnelStatus {
    /// Managers on leave or retired cannot take a new site.
    #[must_use]
    pub const fn can_take_assignment(self) -> bool {
        matches!(self, Self::Available | Self::Deployed)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Deployed => "deployed",
            Self::OnLeave => "on_leave",
            Self::Retired => "retired",
        }
    }
}

impl fmt::Display for PersonnelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// CertificateStatus
// ---------------------------------------------------------------------------

/// Availability of a certificate for site assignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CertificateStatus {
    #[default]
    Available,
    InUse,
    Expired,
}

impl CertificateStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::InUse => "in_use",
            Self::Expired => "expired",
        }
    }
}

impl fmt::Display for CertificateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// EntityType
// ---------------------------------------------------------------------------

/// The three record kinds managed by Siteboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Site,
    Personnel,
    Certificate,
}

impl EntityType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Site => "site",
            Self::Personnel => "personnel",
            Self::Certificate => "certificate",
        }
    }

    /// Table name in both the local store and the Supabase schema.
    #[must_use]
    pub const fn table(self) -> &'static str {
        match self {
            Self::Site => "sites",
            Self::Personnel => "personnel",
            Self::Certificate => "certificates",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_serde_roundtrip {
        ($name:ident, $ty:ty, $variant:expr, $expected_str:expr) => {
            #[test]
            fn $name() {
                let val = $variant;
                let json = serde_json::to_string(&val).unwrap();
                assert_eq!(json, format!("\"{}\"", $expected_str));
                let recovered: $ty = serde_json::from_str(&json).unwrap();
                assert_eq!(recovered, val);
                assert_eq!(val.as_str(), $expected_str);
            }
        };
    }

    test_serde_roundtrip!(
        site_under_construction,
        SiteState,
        SiteState::UnderConstruction,
        "under_construction"
    );
    test_serde_roundtrip!(site_completed, SiteState, SiteState::Completed, "completed");
    test_serde_roundtrip!(
        assignment_assigned,
        AssignmentStatus,
        AssignmentStatus::Assigned,
        "assigned"
    );
    test_serde_roundtrip!(
        personnel_on_leave,
        PersonnelStatus,
        PersonnelStatus::OnLeave,
        "on_leave"
    );
    test_serde_roundtrip!(
        certificate_in_use,
        CertificateStatus,
        CertificateStatus::InUse,
        "in_use"
    );
    test_serde_roundtrip!(entity_site, EntityType, EntityType::Site, "site");

    #[test]
    fn defaults_match_new_records() {
        assert_eq!(SiteState::default(), SiteState::Permitted);
        assert_eq!(AssignmentStatus::default(), AssignmentStatus::Unassigned);
        assert_eq!(PersonnelStatus::default(), PersonnelStatus::Available);
        assert_eq!(CertificateStatus::default(), CertificateStatus::Available);
    }

    #[test]
    fn leave_and_retirement_block_assignment() {
        assert!(PersonnelStatus::Available.can_take_assignment());
        assert!(PersonnelStatus::Deployed.can_take_assignment());
        assert!(!PersonnelStatus::OnLeave.can_take_assignment());
        assert!(!PersonnelStatus::Retired.can_take_assignment());
    }

    #[test]
    fn unknown_value_is_rejected() {
        let parsed = serde_json::from_str::<SiteState>("\"demolished\"");
        assert!(parsed.is_err());
    }

    #[test]
    fn entity_tables() {
        assert_eq!(EntityType::Site.table(), "sites");
        assert_eq!(EntityType::Personnel.table(), "personnel");
        assert_eq!(EntityType::Certificate.table(), "certificates");
    }
}
