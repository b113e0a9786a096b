use sb_core::filters::{CertificateFilter, PersonnelFilter, SiteFilter};
use sb_core::stats::DashboardStats;

use crate::SupabaseStore;
use crate::error::SupabaseError;

impl SupabaseStore {
    /// Load all three tables concurrently and aggregate.
    ///
    /// # Errors
    ///
    /// Returns the first listing failure.
    pub async fn dashboard_stats(&self) -> Result<DashboardStats, SupabaseError> {
        let site_filter = SiteFilter::default();
        let personnel_filter = PersonnelFilter::default();
        let certificate_filter = CertificateFilter::default();
        let (sites, personnel, certificates) = tokio::join!(
            self.list_sites(&site_filter),
            self.list_personnel(&personnel_filter),
            self.list_certificates(&certificate_filter),
        );
        Ok(DashboardStats::compute(
            &sites?.items,
            &personnel?,
            &certificates?,
        ))
    }
}
