use chrono::Utc;
use serde_json::json;

use sb_core::entities::{NewSite, Site};
use sb_core::enums::{AssignmentStatus, CertificateStatus, EntityType, PersonnelStatus};
use sb_core::errors::CoreError;
use sb_core::filters::{Page, SiteFilter};
use sb_core::ids;
use sb_core::responses::SiteDetail;
use sb_core::updates::SiteUpdate;
use sb_core::validation::validate_assignment;
use sb_core::version::check_version;

use super::{is_unique_violation, patch_body};
use crate::error::SupabaseError;
use crate::{SupabaseStore, query};

const TABLE: &str = "sites";

impl SupabaseStore {
    /// # Errors
    ///
    /// [`CoreError::Duplicate`] when the caller-supplied ID already exists.
    pub async fn create_site(&self, input: NewSite) -> Result<Site, SupabaseError> {
        let requested = input.requested_id().map(String::from);
        let id = match requested {
            Some(ref id) => {
                if self.find_site(id).await?.is_some() {
                    return Err(duplicate(id));
                }
                id.clone()
            }
            None => ids::site_id(),
        };

        let site = input.into_site(id, Utc::now());
        match self.insert::<_, Site>(TABLE, &site).await {
            Ok(created) => {
                tracing::debug!(site_id = %created.id, "site created");
                Ok(created)
            }
            Err(e) if is_unique_violation(&e) => Err(duplicate(&site.id)),
            Err(e) => Err(e),
        }
    }

    /// # Errors
    ///
    /// [`CoreError::NotFound`] when no site has this ID.
    pub async fn get_site(&self, id: &str) -> Result<Site, SupabaseError> {
        self.find_site(id)
            .await?
            .ok_or_else(|| CoreError::not_found(EntityType::Site, id).into())
    }

    pub async fn find_site(&self, id: &str) -> Result<Option<Site>, SupabaseError> {
        self.select_one(TABLE, id).await
    }

    pub async fn list_sites(&self, filter: &SiteFilter) -> Result<Page<Site>, SupabaseError> {
        let (items, total) = self.select_counted(TABLE, &query::sites(filter)).await?;
        Ok(Page { items, total })
    }

    /// # Errors
    ///
    /// [`CoreError::Validation`] for a blank query.
    pub async fn search_sites(&self, needle: &str) -> Result<Vec<Site>, SupabaseError> {
        let needle = needle.trim();
        if needle.is_empty() {
            return Err(CoreError::Validation("search query is required".into()).into());
        }
        self.select(TABLE, &query::site_search(needle)).await
    }

    /// Guarded partial update. Without `expected`, the version just read is
    /// used as the guard so a concurrent writer still causes a conflict.
    ///
    /// # Errors
    ///
    /// [`CoreError::NotFound`] or [`CoreError::VersionConflict`].
    pub async fn update_site(
        &self,
        site_id: &str,
        update: &SiteUpdate,
        expected: Option<i64>,
    ) -> Result<Site, SupabaseError> {
        let current = self.get_site(site_id).await?;
        check_version(site_id, current.version, expected)?;

        let mut body = patch_body(update)?;
        if let Some(map) = body.as_object_mut() {
            map.insert("version".to_string(), json!(current.version + 1));
        }
        let site = self.claim_site(site_id, current.version, &body).await?;
        tracing::debug!(site_id, version = site.version, fields = ?update.changed_fields(), "site updated");
        Ok(site)
    }

    /// # Errors
    ///
    /// [`CoreError::NotFound`], [`CoreError::CertificateUnavailable`],
    /// [`CoreError::Validation`] or [`CoreError::VersionConflict`].
    pub async fn assign_site(
        &self,
        site_id: &str,
        manager_id: &str,
        certificate_id: &str,
        expected: Option<i64>,
    ) -> Result<Site, SupabaseError> {
        let site = self.get_site(site_id).await?;
        let manager = self.get_personnel(manager_id).await?;
        let certificate = self.get_certificate(certificate_id).await?;
        if certificate.status != CertificateStatus::Available {
            return Err(CoreError::CertificateUnavailable {
                id: certificate.id,
            }
            .into());
        }
        validate_assignment(&site, &manager, &certificate)?;
        check_version(site_id, site.version, expected)?;

        let now = Utc::now().to_rfc3339();
        let claimed = self
            .claim_site(
                site_id,
                site.version,
                &json!({
                    "manager_id": manager_id,
                    "certificate_id": certificate_id,
                    "assignment_status": AssignmentStatus::Assigned,
                    "version": site.version + 1,
                    "updated_at": now,
                }),
            )
            .await?;

        self.follow_up(
            site_id,
            "personnel",
            manager_id,
            &json!({
                "current_site_count": manager.current_site_count + 1,
                "status": PersonnelStatus::Deployed,
                "updated_at": now,
            }),
        )
        .await?;
        self.follow_up(
            site_id,
            "certificates",
            certificate_id,
            &json!({
                "status": CertificateStatus::InUse,
                "current_site_id": site_id,
                "updated_at": now,
            }),
        )
        .await?;

        tracing::debug!(site_id, manager_id, certificate_id, version = claimed.version, "site assigned");
        Ok(claimed)
    }

    /// # Errors
    ///
    /// [`CoreError::NotFound`], [`CoreError::NotAssigned`] or
    /// [`CoreError::VersionConflict`].
    pub async fn unassign_site(
        &self,
        site_id: &str,
        expected: Option<i64>,
    ) -> Result<Site, SupabaseError> {
        let site = self.get_site(site_id).await?;
        check_version(site_id, site.version, expected)?;
        let Some(manager_id) = site.manager_id.clone() else {
            return Err(CoreError::NotAssigned {
                site_id: site_id.to_string(),
            }
            .into());
        };

        let now = Utc::now().to_rfc3339();
        let released = self
            .claim_site(
                site_id,
                site.version,
                &json!({
                    "manager_id": null,
                    "certificate_id": null,
                    "assignment_status": AssignmentStatus::Unassigned,
                    "version": site.version + 1,
                    "updated_at": now,
                }),
            )
            .await?;

        if let Some(manager) = self.find_personnel(&manager_id).await? {
            let remaining = manager.current_site_count.saturating_sub(1);
            let status = if remaining == 0 {
                PersonnelStatus::Available
            } else {
                manager.status
            };
            self.follow_up(
                site_id,
                "personnel",
                &manager_id,
                &json!({
                    "current_site_count": remaining,
                    "status": status,
                    "updated_at": now,
                }),
            )
            .await?;
        }
        if let Some(ref certificate_id) = site.certificate_id {
            self.follow_up(
                site_id,
                "certificates",
                certificate_id,
                &json!({
                    "status": CertificateStatus::Available,
                    "current_site_id": null,
                    "updated_at": now,
                }),
            )
            .await?;
        }

        tracing::debug!(site_id, manager_id, version = released.version, "site unassigned");
        Ok(released)
    }

    /// # Errors
    ///
    /// [`CoreError::NotFound`] when the site does not exist.
    pub async fn site_detail(&self, site_id: &str) -> Result<SiteDetail, SupabaseError> {
        let site = self.get_site(site_id).await?;
        let manager = match site.manager_id.as_deref() {
            Some(id) => self.find_personnel(id).await?,
            None => None,
        };
        let certificate = match site.certificate_id.as_deref() {
            Some(id) => self.find_certificate(id).await?,
            None => None,
        };
        Ok(SiteDetail::new(site, manager.as_ref(), certificate.as_ref()))
    }

    /// PATCH the site only if it is still at `version`. An empty
    /// representation is resolved into `NotFound` or `VersionConflict`.
    async fn claim_site(
        &self,
        site_id: &str,
        version: i64,
        body: &serde_json::Value,
    ) -> Result<Site, SupabaseError> {
        let mut rows: Vec<Site> = self
            .patch(TABLE, &query::by_id_and_version(site_id, version), body)
            .await?;
        if !rows.is_empty() {
            return Ok(rows.swap_remove(0));
        }
        match self.find_site(site_id).await? {
            Some(current) => {
                tracing::info!(site_id, current = current.version, expected = version, "guarded patch missed: version conflict");
                Err(CoreError::VersionConflict {
                    id: site_id.to_string(),
                    current: current.version,
                    expected: version,
                }
                .into())
            }
            None => Err(CoreError::not_found(EntityType::Site, site_id).into()),
        }
    }

    /// Patch a row linked to a site that has already been claimed.
    async fn follow_up(
        &self,
        site_id: &str,
        table: &str,
        id: &str,
        body: &serde_json::Value,
    ) -> Result<(), SupabaseError> {
        self.patch::<serde_json::Value>(table, &query::by_id(id), body)
            .await
            .map(|_| ())
            .inspect_err(|e| {
                tracing::warn!(site_id, table, id, error = %e, "site row updated but linked row patch failed");
            })
    }
}

fn duplicate(id: &str) -> SupabaseError {
    CoreError::Duplicate {
        entity: EntityType::Site,
        id: id.to_string(),
    }
    .into()
}
