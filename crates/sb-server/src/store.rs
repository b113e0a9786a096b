//! Backend selection and dispatch.
//!
//! Handlers talk to [`Backend`], which forwards each call to the local libSQL
//! store or to Supabase and folds both error types into [`StoreError`].

use std::path::Path;

use thiserror::Error;

use sb_config::{SiteboardConfig, StoreBackend};
use sb_core::entities::{
    Certificate, NewCertificate, NewPersonnel, NewSite, Personnel, Site,
};
use sb_core::errors::CoreError;
use sb_core::filters::{CertificateFilter, Page, PersonnelFilter, SiteFilter};
use sb_core::responses::SiteDetail;
use sb_core::stats::DashboardStats;
use sb_core::updates::{CertificateUpdate, PersonnelUpdate, SiteUpdate};
use sb_db::error::DatabaseError;
use sb_db::repos::seed::SeedData;
use sb_db::service::SiteService;
use sb_supabase::{SupabaseError, SupabaseStore};

#[derive(Debug, Error)]
pub enum StoreError {
    /// A domain rule rejected the call.
    #[error(transparent)]
    Core(CoreError),

    /// No usable backend was configured.
    #[error("{0}")]
    Unavailable(String),

    #[error(transparent)]
    Local(DatabaseError),

    #[error(transparent)]
    Remote(SupabaseError),
}

impl From<DatabaseError> for StoreError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::Core(core) => Self::Core(core),
            other => Self::Local(other),
        }
    }
}

impl From<SupabaseError> for StoreError {
    fn from(err: SupabaseError) -> Self {
        match err {
            SupabaseError::Core(core) => Self::Core(core),
            SupabaseError::NotConfigured => Self::Unavailable(err.to_string()),
            other => Self::Remote(other),
        }
    }
}

pub enum Backend {
    Local(SiteService),
    Supabase(SupabaseStore),
    /// Every call fails with 503 until the configuration is fixed.
    Unavailable { reason: String },
}

macro_rules! dispatch {
    ($self:ident, $store:ident => $call:expr) => {
        match $self {
            Self::Local($store) => $call.await.map_err(StoreError::from),
            Self::Supabase($store) => $call.await.map_err(StoreError::from),
            Self::Unavailable { reason } => Err(StoreError::Unavailable(reason.clone())),
        }
    };
}

impl Backend {
    /// Open the configured backend. Failures are logged and produce
    /// [`Backend::Unavailable`] so the server still starts and reports 503.
    pub async fn connect(config: &SiteboardConfig) -> Self {
        let backend = match config.store.backend {
            StoreBackend::Local => Self::open_local(&config.store.path).await,
            StoreBackend::Memory => Self::open_local(":memory:").await,
            StoreBackend::Supabase => match SupabaseStore::new(&config.supabase) {
                Ok(store) => Self::Supabase(store),
                Err(e) => Self::Unavailable {
                    reason: e.to_string(),
                },
            },
        };

        match backend {
            Self::Local(ref service) if config.store.has_seed_file() => {
                seed_if_empty(service, Path::new(&config.store.seed_file)).await;
            }
            Self::Supabase(_) if config.store.has_seed_file() => {
                tracing::warn!("store.seed_file is ignored for the supabase backend");
            }
            Self::Unavailable { ref reason } => {
                tracing::error!(%reason, "store unavailable; API will answer 503");
            }
            _ => {}
        }
        backend
    }

    async fn open_local(path: &str) -> Self {
        match SiteService::new_local(path).await {
            Ok(service) => Self::Local(service),
            Err(e) => Self::Unavailable {
                reason: format!("cannot open local store at {path}: {e}"),
            },
        }
    }

    /// In-memory store, used by tests and the offline mock.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the database cannot be created.
    pub async fn memory() -> Result<Self, StoreError> {
        Ok(Self::Local(SiteService::new_local(":memory:").await?))
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Local(_) => "local",
            Self::Supabase(_) => "supabase",
            Self::Unavailable { .. } => "unavailable",
        }
    }

    pub async fn list_sites(&self, filter: &SiteFilter) -> Result<Page<Site>, StoreError> {
        dispatch!(self, s => s.list_sites(filter))
    }

    pub async fn search_sites(&self, needle: &str) -> Result<Vec<Site>, StoreError> {
        dispatch!(self, s => s.search_sites(needle))
    }

    pub async fn get_site(&self, id: &str) -> Result<Site, StoreError> {
        dispatch!(self, s => s.get_site(id))
    }

    pub async fn site_detail(&self, id: &str) -> Result<SiteDetail, StoreError> {
        dispatch!(self, s => s.site_detail(id))
    }

    pub async fn create_site(&self, input: NewSite) -> Result<Site, StoreError> {
        dispatch!(self, s => s.create_site(input))
    }

    pub async fn update_site(
        &self,
        id: &str,
        update: &SiteUpdate,
        expected: Option<i64>,
    ) -> Result<Site, StoreError> {
        dispatch!(self, s => s.update_site(id, update, expected))
    }

    pub async fn assign_site(
        &self,
        id: &str,
        manager_id: &str,
        certificate_id: &str,
        expected: Option<i64>,
    ) -> Result<Site, StoreError> {
        dispatch!(self, s => s.assign_site(id, manager_id, certificate_id, expected))
    }

    pub async fn unassign_site(&self, id: &str, expected: Option<i64>) -> Result<Site, StoreError> {
        dispatch!(self, s => s.unassign_site(id, expected))
    }

    pub async fn list_personnel(
        &self,
        filter: &PersonnelFilter,
    ) -> Result<Vec<Personnel>, StoreError> {
        dispatch!(self, s => s.list_personnel(filter))
    }

    pub async fn get_personnel(&self, id: &str) -> Result<Personnel, StoreError> {
        dispatch!(self, s => s.get_personnel(id))
    }

    pub async fn create_personnel(&self, input: NewPersonnel) -> Result<Personnel, StoreError> {
        dispatch!(self, s => s.create_personnel(input))
    }

    pub async fn update_personnel(
        &self,
        id: &str,
        update: &PersonnelUpdate,
    ) -> Result<Personnel, StoreError> {
        dispatch!(self, s => s.update_personnel(id, update))
    }

    pub async fn list_certificates(
        &self,
        filter: &CertificateFilter,
    ) -> Result<Vec<Certificate>, StoreError> {
        dispatch!(self, s => s.list_certificates(filter))
    }

    pub async fn get_certificate(&self, id: &str) -> Result<Certificate, StoreError> {
        dispatch!(self, s => s.get_certificate(id))
    }

    pub async fn create_certificate(
        &self,
        input: NewCertificate,
    ) -> Result<Certificate, StoreError> {
        dispatch!(self, s => s.create_certificate(input))
    }

    pub async fn update_certificate(
        &self,
        id: &str,
        update: &CertificateUpdate,
    ) -> Result<Certificate, StoreError> {
        dispatch!(self, s => s.update_certificate(id, update))
    }

    pub async fn dashboard_stats(&self) -> Result<DashboardStats, StoreError> {
        dispatch!(self, s => s.dashboard_stats())
    }
}

async fn seed_if_empty(service: &SiteService, path: &Path) {
    match service.is_empty().await {
        Ok(true) => {}
        Ok(false) => {
            tracing::debug!(path = %path.display(), "store already populated; skipping seed");
            return;
        }
        Err(e) => {
            tracing::warn!(error = %e, "cannot inspect store before seeding");
            return;
        }
    }
    let report = match SeedData::from_file(path) {
        Ok(data) => service.seed(&data).await,
        Err(e) => Err(e),
    };
    match report {
        Ok(report) => tracing::info!(
            sites = report.sites,
            personnel = report.personnel,
            certificates = report.certificates,
            "seeded store from {}",
            path.display()
        ),
        Err(e) => tracing::warn!(error = %e, path = %path.display(), "seeding failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn supabase_without_credentials_is_unavailable() {
        let mut config = SiteboardConfig::default();
        config.store.backend = StoreBackend::Supabase;
        let backend = Backend::connect(&config).await;
        assert_eq!(backend.name(), "unavailable");

        let err = backend.get_site("SITE-1").await.unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
    }

    #[tokio::test]
    async fn memory_backend_seeds_from_fixture() {
        let dir = tempfile::tempdir().unwrap();
        let fixture = dir.path().join("seed.json");
        let now = chrono::Utc::now();
        let site = NewSite {
            name: "Harbor".into(),
            company: "더존하우징".into(),
            address: "Busan".into(),
            ..NewSite::default()
        }
        .into_site("SITE-SEED".into(), now);
        let data = SeedData {
            sites: vec![site],
            ..SeedData::default()
        };
        std::fs::write(&fixture, serde_json::to_string(&data).unwrap()).unwrap();

        let mut config = SiteboardConfig::default();
        config.store.backend = StoreBackend::Memory;
        config.store.seed_file = fixture.display().to_string();
        let backend = Backend::connect(&config).await;

        assert_eq!(backend.name(), "local");
        assert_eq!(backend.get_site("SITE-SEED").await.unwrap().name, "Harbor");
    }

    #[test]
    fn domain_errors_are_unwrapped() {
        let err = StoreError::from(DatabaseError::Core(CoreError::NotAssigned {
            site_id: "SITE-1".into(),
        }));
        assert!(matches!(err, StoreError::Core(CoreError::NotAssigned { .. })));
        let err = StoreError::from(SupabaseError::NotConfigured);
        assert!(matches!(err, StoreError::Unavailable(_)));
    }
}
