use chrono::Utc;

use sb_core::entities::{Certificate, NewCertificate};
use sb_core::enums::EntityType;
use sb_core::errors::CoreError;
use sb_core::filters::CertificateFilter;
use sb_core::ids;
use sb_core::updates::CertificateUpdate;

use super::patch_body;
use crate::error::SupabaseError;
use crate::{SupabaseStore, query};

const TABLE: &str = "certificates";

impl SupabaseStore {
    /// # Errors
    ///
    /// Returns `SupabaseError` if the insert fails.
    pub async fn create_certificate(
        &self,
        input: NewCertificate,
    ) -> Result<Certificate, SupabaseError> {
        let certificate = input.into_certificate(ids::certificate_id(), ids::owner_id(), Utc::now());
        let created: Certificate = self.insert(TABLE, &certificate).await?;
        tracing::debug!(certificate_id = %created.id, "certificate created");
        Ok(created)
    }

    /// # Errors
    ///
    /// [`CoreError::NotFound`] when no certificate has this ID.
    pub async fn get_certificate(&self, id: &str) -> Result<Certificate, SupabaseError> {
        self.find_certificate(id)
            .await?
            .ok_or_else(|| CoreError::not_found(EntityType::Certificate, id).into())
    }

    pub async fn find_certificate(&self, id: &str) -> Result<Option<Certificate>, SupabaseError> {
        self.select_one(TABLE, id).await
    }

    pub async fn list_certificates(
        &self,
        filter: &CertificateFilter,
    ) -> Result<Vec<Certificate>, SupabaseError> {
        self.select(TABLE, &query::certificates(filter)).await
    }

    /// # Errors
    ///
    /// [`CoreError::NotFound`] when no certificate has this ID.
    pub async fn update_certificate(
        &self,
        id: &str,
        update: &CertificateUpdate,
    ) -> Result<Certificate, SupabaseError> {
        let mut rows: Vec<Certificate> = self
            .patch(TABLE, &query::by_id(id), &patch_body(update)?)
            .await?;
        if rows.is_empty() {
            return Err(CoreError::not_found(EntityType::Certificate, id).into());
        }
        tracing::debug!(certificate_id = id, fields = ?update.changed_fields(), "certificate updated");
        Ok(rows.swap_remove(0))
    }
}
