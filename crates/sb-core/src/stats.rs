//! Dashboard counters.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{Certificate, Personnel, Site};
use crate::enums::{AssignmentStatus, CertificateStatus, PersonnelStatus};

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SiteStats {
    pub total: u64,
    pub assigned: u64,
    pub unassigned: u64,
    pub by_company: BTreeMap<String, u64>,
    pub by_state: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct PersonnelStats {
    pub total: u64,
    pub available: u64,
    pub deployed: u64,
    pub by_role: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CertificateStats {
    pub total: u64,
    pub available: u64,
    pub in_use: u64,
    pub expired: u64,
}

/// Aggregate counts shown on the dashboard header.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct DashboardStats {
    pub sites: SiteStats,
    pub personnel: PersonnelStats,
    pub certificates: CertificateStats,
}

impl DashboardStats {
    #[must_use]
    pub fn compute(sites: &[Site], personnel: &[Personnel], certificates: &[Certificate]) -> Self {
        let mut stats = Self::default();

        for site in sites {
            stats.sites.total += 1;
            match site.assignment_status {
                AssignmentStatus::Assigned => stats.sites.assigned += 1,
                AssignmentStatus::Unassigned => stats.sites.unassigned += 1,
            }
            *stats
                .sites
                .by_company
                .entry(site.company.clone())
                .or_default() += 1;
            *stats
                .sites
                .by_state
                .entry(site.state.as_str().to_string())
                .or_default() += 1;
        }

        for person in personnel {
            stats.personnel.total += 1;
            match person.status {
                PersonnelStatus::Available => stats.personnel.available += 1,
                PersonnelStatus::Deployed => stats.personnel.deployed += 1,
                PersonnelStatus::OnLeave | PersonnelStatus::Retired => {}
            }
            *stats
                .personnel
                .by_role
                .entry(person.role.clone())
                .or_default() += 1;
        }

        for certificate in certificates {
            stats.certificates.total += 1;
            match certificate.status {
                CertificateStatus::Available => stats.certificates.available += 1,
                CertificateStatus::InUse => stats.certificates.in_use += 1,
                CertificateStatus::Expired => stats.certificates.expired += 1,
            }
        }

        stats
    }
}
