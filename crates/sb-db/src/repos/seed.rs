//! Bulk fixture loading for the offline mock and demos.

use std::path::Path;

use serde::{Deserialize, Serialize};

use sb_core::entities::{Certificate, Personnel, Site};

use super::certificate::insert_certificate;
use super::personnel::insert_personnel;
use super::site::insert_site;
use crate::error::DatabaseError;
use crate::service::SiteService;

/// Fixture file contents: complete records, inserted as-is.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub sites: Vec<Site>,
    #[serde(default)]
    pub personnel: Vec<Personnel>,
    #[serde(default)]
    pub certificates: Vec<Certificate>,
}

impl SeedData {
    /// Read a JSON fixture file.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Other` if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, DatabaseError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("read {}: {e}", path.display()))?;
        serde_json::from_str(&raw)
            .map_err(|e| anyhow::anyhow!("parse {}: {e}", path.display()).into())
    }
}

/// Rows inserted per table; rows whose ID already existed are skipped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub sites: usize,
    pub personnel: usize,
    pub certificates: usize,
    pub skipped: usize,
}

impl SiteService {
    /// Insert fixture rows in one transaction, skipping IDs already present.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if an insert fails; nothing is committed then.
    pub async fn seed(&self, data: &SeedData) -> Result<SeedReport, DatabaseError> {
        let _guard = self.lock().await;
        let mut report = SeedReport::default();
        let tx = self.db().conn().transaction().await?;

        for person in &data.personnel {
            if self.find_personnel(&person.id).await?.is_some() {
                report.skipped += 1;
                continue;
            }
            insert_personnel(&tx, person).await?;
            report.personnel += 1;
        }
        for certificate in &data.certificates {
            if self.find_certificate(&certificate.id).await?.is_some() {
                report.skipped += 1;
                continue;
            }
            insert_certificate(&tx, certificate).await?;
            report.certificates += 1;
        }
        for site in &data.sites {
            if self.find_site(&site.id).await?.is_some() {
                report.skipped += 1;
                continue;
            }
            insert_site(&tx, site).await?;
            report.sites += 1;
        }

        tx.commit().await?;
        tracing::info!(
            sites = report.sites,
            personnel = report.personnel,
            certificates = report.certificates,
            skipped = report.skipped,
            "seed data loaded"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::test_support::helpers::{new_site, test_service};

    #[tokio::test]
    async fn seed_inserts_and_skips_existing() {
        let svc = test_service().await;
        let existing = svc.create_site(new_site("Existing")).await.unwrap();

        let mut fresh = existing.clone();
        fresh.id = "SITE-SEEDED".into();
        fresh.name = "Seeded".into();

        let data = SeedData {
            sites: vec![existing, fresh],
            ..Default::default()
        };
        let report = svc.seed(&data).await.unwrap();
        assert_eq!(
            report,
            SeedReport {
                sites: 1,
                personnel: 0,
                certificates: 0,
                skipped: 1,
            }
        );
        assert_eq!(svc.get_site("SITE-SEEDED").await.unwrap().name, "Seeded");
        assert!(!svc.is_empty().await.unwrap());
    }

    #[test]
    fn from_file_reports_parse_errors() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("seed.json");
        std::fs::write(&path, "{\"sites\": 3}").unwrap();
        let err = SeedData::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("seed.json"), "{err}");
    }

    #[test]
    fn empty_object_is_valid_seed() {
        let data: SeedData = serde_json::from_str("{}").unwrap();
        assert!(data.sites.is_empty());
    }
}
