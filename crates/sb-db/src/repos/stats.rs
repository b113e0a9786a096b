//! Dashboard statistics over the whole store.

use sb_core::filters::{CertificateFilter, PersonnelFilter, SiteFilter};
use sb_core::stats::DashboardStats;

use crate::error::DatabaseError;
use crate::service::SiteService;

impl SiteService {
    /// # Errors
    ///
    /// Returns `DatabaseError` if any listing query fails.
    pub async fn dashboard_stats(&self) -> Result<DashboardStats, DatabaseError> {
        let sites = self.list_sites(&SiteFilter::default()).await?.items;
        let personnel = self.list_personnel(&PersonnelFilter::default()).await?;
        let certificates = self.list_certificates(&CertificateFilter::default()).await?;
        Ok(DashboardStats::compute(&sites, &personnel, &certificates))
    }
}
