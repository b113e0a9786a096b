//! Site repository: CRUD, search, and version-guarded assignment.

use chrono::Utc;

use sb_core::entities::{NewSite, Site};
use sb_core::enums::{AssignmentStatus, CertificateStatus, EntityType, PersonnelStatus};
use sb_core::errors::CoreError;
use sb_core::filters::{Page, SiteFilter};
use sb_core::ids;
use sb_core::responses::SiteDetail;
use sb_core::updates::SiteUpdate;
use sb_core::validation::validate_assignment;
use sb_core::version::check_version;

use crate::error::DatabaseError;
use crate::helpers::{
    contains_folded, date_param, get_opt_date, get_opt_string, opt_real, opt_text, parse_datetime,
    parse_enum,
};
use crate::service::SiteService;

const SELECT_COLS: &str = "id, name, owner_name, company, address, latitude, longitude, \
     permit_date, start_date, completion_date, state, notes, manager_id, certificate_id, \
     completion_doc_url, assignment_status, version, created_at, updated_at";

/// Attempts at drawing a fresh ID before giving up.
const ID_ATTEMPTS: usize = 5;

fn row_to_site(row: &libsql::Row) -> Result<Site, DatabaseError> {
    Ok(Site {
        id: row.get(0)?,
        name: row.get(1)?,
        owner_name: get_opt_string(row, 2)?,
        company: row.get(3)?,
        address: row.get(4)?,
        latitude: row.get::<Option<f64>>(5)?,
        longitude: row.get::<Option<f64>>(6)?,
        permit_date: get_opt_date(row, 7)?,
        start_date: get_opt_date(row, 8)?,
        completion_date: get_opt_date(row, 9)?,
        state: parse_enum(&row.get::<String>(10)?)?,
        notes: get_opt_string(row, 11)?,
        manager_id: get_opt_string(row, 12)?,
        certificate_id: get_opt_string(row, 13)?,
        completion_doc_url: get_opt_string(row, 14)?,
        assignment_status: parse_enum(&row.get::<String>(15)?)?,
        version: row.get(16)?,
        created_at: parse_datetime(&row.get::<String>(17)?)?,
        updated_at: parse_datetime(&row.get::<String>(18)?)?,
    })
}

/// Insert a fully-formed site row. Shared by create and seed.
pub(crate) async fn insert_site(conn: &libsql::Connection, site: &Site) -> Result<(), DatabaseError> {
    conn.execute(
        &format!(
            "INSERT INTO sites ({SELECT_COLS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19)"
        ),
        libsql::params_from_iter(vec![
            libsql::Value::from(site.id.as_str()),
            site.name.as_str().into(),
            opt_text(site.owner_name.as_deref()),
            site.company.as_str().into(),
            site.address.as_str().into(),
            opt_real(site.latitude),
            opt_real(site.longitude),
            date_param(site.permit_date),
            date_param(site.start_date),
            date_param(site.completion_date),
            site.state.as_str().into(),
            opt_text(site.notes.as_deref()),
            opt_text(site.manager_id.as_deref()),
            opt_text(site.certificate_id.as_deref()),
            opt_text(site.completion_doc_url.as_deref()),
            site.assignment_status.as_str().into(),
            site.version.into(),
            site.created_at.to_rfc3339().into(),
            site.updated_at.to_rfc3339().into(),
        ]),
    )
    .await?;
    Ok(())
}

impl SiteService {
    /// Register a site. A blank ID is replaced with a generated one.
    ///
    /// # Errors
    ///
    /// [`CoreError::Duplicate`] when the caller-supplied ID already exists.
    pub async fn create_site(&self, input: NewSite) -> Result<Site, DatabaseError> {
        let _guard = self.lock().await;

        let id = match input.requested_id() {
            Some(requested) => {
                if self.find_site(requested).await?.is_some() {
                    return Err(CoreError::Duplicate {
                        entity: EntityType::Site,
                        id: requested.to_string(),
                    }
                    .into());
                }
                requested.to_string()
            }
            None => self.fresh_site_id().await?,
        };

        let site = input.into_site(id, Utc::now());
        insert_site(self.db().conn(), &site).await?;
        tracing::debug!(site_id = %site.id, "site created");
        Ok(site)
    }

    async fn fresh_site_id(&self) -> Result<String, DatabaseError> {
        for _ in 0..ID_ATTEMPTS {
            let candidate = ids::site_id();
            if self.find_site(&candidate).await?.is_none() {
                return Ok(candidate);
            }
        }
        Err(DatabaseError::InvalidState(
            "could not generate a unique site id".into(),
        ))
    }

    /// # Errors
    ///
    /// [`CoreError::NotFound`] when no site has this ID.
    pub async fn get_site(&self, id: &str) -> Result<Site, DatabaseError> {
        self.find_site(id)
            .await?
            .ok_or_else(|| CoreError::not_found(EntityType::Site, id).into())
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn find_site(&self, id: &str) -> Result<Option<Site>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {SELECT_COLS} FROM sites WHERE id = ?1"), [id])
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_site(&row)?)),
            None => Ok(None),
        }
    }

    /// List sites matching the filter, ordered by ID. `total` counts every
    /// match before `limit`/`offset` are applied.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_sites(&self, filter: &SiteFilter) -> Result<Page<Site>, DatabaseError> {
        let mut conditions = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(ref company) = filter.company {
            params.push(company.as_str().into());
            conditions.push(format!("company = ?{}", params.len()));
        }
        if let Some(status) = filter.assignment_status {
            params.push(status.as_str().into());
            conditions.push(format!("assignment_status = ?{}", params.len()));
        }
        if let Some(state) = filter.state {
            params.push(state.as_str().into());
            conditions.push(format!("state = ?{}", params.len()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT COUNT(*) FROM sites {where_clause}"),
                libsql::params_from_iter(params.clone()),
            )
            .await?;
        let total = match rows.next().await? {
            Some(row) => u64::try_from(row.get::<i64>(0)?).unwrap_or_default(),
            None => 0,
        };

        // SQLite treats a negative LIMIT as unbounded.
        let limit = filter.limit.map_or(-1, i64::from);
        params.push(limit.into());
        let limit_idx = params.len();
        params.push(i64::from(filter.offset()).into());
        let offset_idx = params.len();

        let sql = format!(
            "SELECT {SELECT_COLS} FROM sites {where_clause} ORDER BY id ASC LIMIT ?{limit_idx} OFFSET ?{offset_idx}"
        );
        let mut rows = self
            .db()
            .conn()
            .query(&sql, libsql::params_from_iter(params))
            .await?;
        let mut items = Vec::new();
        while let Some(row) = rows.next().await? {
            items.push(row_to_site(&row)?);
        }
        Ok(Page { items, total })
    }

    /// Case-insensitive substring search over name and address.
    ///
    /// # Errors
    ///
    /// [`CoreError::Validation`] for a blank query.
    pub async fn search_sites(&self, query: &str) -> Result<Vec<Site>, DatabaseError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(CoreError::Validation("search query is required".into()).into());
        }
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {SELECT_COLS} FROM sites ORDER BY id ASC"), ())
            .await?;
        let mut items = Vec::new();
        while let Some(row) = rows.next().await? {
            let site = row_to_site(&row)?;
            if contains_folded(&site.name, query) || contains_folded(&site.address, query) {
                items.push(site);
            }
        }
        Ok(items)
    }

    /// Apply a partial update. With `expected` set, the write only happens if
    /// the stored version still matches.
    ///
    /// # Errors
    ///
    /// [`CoreError::NotFound`] or [`CoreError::VersionConflict`].
    pub async fn update_site(
        &self,
        site_id: &str,
        update: &SiteUpdate,
        expected: Option<i64>,
    ) -> Result<Site, DatabaseError> {
        let _guard = self.lock().await;

        let mut sets = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(ref name) = update.name {
            params.push(name.trim().into());
            sets.push(format!("name = ?{}", params.len()));
        }
        if let Some(ref owner_name) = update.owner_name {
            params.push(opt_text(owner_name.as_deref()));
            sets.push(format!("owner_name = ?{}", params.len()));
        }
        if let Some(ref company) = update.company {
            params.push(company.trim().into());
            sets.push(format!("company = ?{}", params.len()));
        }
        if let Some(ref address) = update.address {
            params.push(address.trim().into());
            sets.push(format!("address = ?{}", params.len()));
        }
        if let Some(latitude) = update.latitude {
            params.push(opt_real(latitude));
            sets.push(format!("latitude = ?{}", params.len()));
        }
        if let Some(longitude) = update.longitude {
            params.push(opt_real(longitude));
            sets.push(format!("longitude = ?{}", params.len()));
        }
        if let Some(date) = update.permit_date {
            params.push(date_param(date));
            sets.push(format!("permit_date = ?{}", params.len()));
        }
        if let Some(date) = update.start_date {
            params.push(date_param(date));
            sets.push(format!("start_date = ?{}", params.len()));
        }
        if let Some(date) = update.completion_date {
            params.push(date_param(date));
            sets.push(format!("completion_date = ?{}", params.len()));
        }
        if let Some(state) = update.state {
            params.push(state.as_str().into());
            sets.push(format!("state = ?{}", params.len()));
        }
        if let Some(ref notes) = update.notes {
            params.push(opt_text(notes.as_deref()));
            sets.push(format!("notes = ?{}", params.len()));
        }
        if let Some(ref url) = update.completion_doc_url {
            params.push(opt_text(url.as_deref()));
            sets.push(format!("completion_doc_url = ?{}", params.len()));
        }

        params.push(Utc::now().to_rfc3339().into());
        sets.push(format!("updated_at = ?{}", params.len()));
        sets.push("version = version + 1".to_string());

        params.push(site_id.into());
        let mut sql = format!(
            "UPDATE sites SET {} WHERE id = ?{}",
            sets.join(", "),
            params.len()
        );
        if let Some(expected) = expected {
            params.push(expected.into());
            sql.push_str(&format!(" AND version = ?{}", params.len()));
        }

        let changed = self
            .db()
            .conn()
            .execute(&sql, libsql::params_from_iter(params))
            .await?;
        if changed == 0 {
            return Err(self.explain_missed_write(site_id, expected).await);
        }

        let site = self.get_site(site_id).await?;
        tracing::debug!(site_id, version = site.version, fields = ?update.changed_fields(), "site updated");
        Ok(site)
    }

    /// Link a manager and certificate to a site in one transaction.
    ///
    /// Checks run in order: the three records exist, the certificate is
    /// available, the assignment rules hold, then the version matches.
    ///
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
    ) -> Result<Site, DatabaseError> {
        let _guard = self.lock().await;

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
        if let Err(e) = check_version(site_id, site.version, expected) {
            tracing::info!(site_id, current = site.version, ?expected, "assign rejected: version conflict");
            return Err(e.into());
        }

        let now = Utc::now().to_rfc3339();
        let tx = self.db().conn().transaction().await?;

        let changed = tx
            .execute(
                "UPDATE sites SET manager_id = ?1, certificate_id = ?2, assignment_status = ?3,
                     updated_at = ?4, version = version + 1
                 WHERE id = ?5 AND version = ?6",
                libsql::params![
                    manager_id,
                    certificate_id,
                    AssignmentStatus::Assigned.as_str(),
                    now.as_str(),
                    site_id,
                    site.version
                ],
            )
            .await?;
        if changed == 0 {
            return Err(CoreError::VersionConflict {
                id: site_id.to_string(),
                current: site.version,
                expected: expected.unwrap_or(site.version),
            }
            .into());
        }

        tx.execute(
            "UPDATE personnel SET current_site_count = current_site_count + 1, status = ?1, updated_at = ?2
             WHERE id = ?3",
            libsql::params![PersonnelStatus::Deployed.as_str(), now.as_str(), manager_id],
        )
        .await?;

        tx.execute(
            "UPDATE certificates SET status = ?1, current_site_id = ?2, updated_at = ?3 WHERE id = ?4",
            libsql::params![
                CertificateStatus::InUse.as_str(),
                site_id,
                now.as_str(),
                certificate_id
            ],
        )
        .await?;

        tx.commit().await?;

        let site = self.get_site(site_id).await?;
        tracing::debug!(site_id, manager_id, certificate_id, version = site.version, "site assigned");
        Ok(site)
    }

    /// Release a site's manager and certificate in one transaction.
    ///
    /// The manager's site count drops by one (never below zero) and a manager
    /// with no remaining sites becomes available again.
    ///
    /// # Errors
    ///
    /// [`CoreError::NotFound`], [`CoreError::NotAssigned`] or
    /// [`CoreError::VersionConflict`].
    pub async fn unassign_site(
        &self,
        site_id: &str,
        expected: Option<i64>,
    ) -> Result<Site, DatabaseError> {
        let _guard = self.lock().await;

        let site = self.get_site(site_id).await?;
        if let Err(e) = check_version(site_id, site.version, expected) {
            tracing::info!(site_id, current = site.version, ?expected, "unassign rejected: version conflict");
            return Err(e.into());
        }
        let Some(manager_id) = site.manager_id.clone() else {
            return Err(CoreError::NotAssigned {
                site_id: site_id.to_string(),
            }
            .into());
        };

        let now = Utc::now().to_rfc3339();
        let tx = self.db().conn().transaction().await?;

        let changed = tx
            .execute(
                "UPDATE sites SET manager_id = NULL, certificate_id = NULL, assignment_status = ?1,
                     updated_at = ?2, version = version + 1
                 WHERE id = ?3 AND version = ?4",
                libsql::params![
                    AssignmentStatus::Unassigned.as_str(),
                    now.as_str(),
                    site_id,
                    site.version
                ],
            )
            .await?;
        if changed == 0 {
            return Err(CoreError::VersionConflict {
                id: site_id.to_string(),
                current: site.version,
                expected: expected.unwrap_or(site.version),
            }
            .into());
        }

        // SET expressions see the pre-update row.
        tx.execute(
            "UPDATE personnel SET
                 current_site_count = MAX(0, current_site_count - 1),
                 status = CASE WHEN current_site_count <= 1 THEN ?1 ELSE status END,
                 updated_at = ?2
             WHERE id = ?3",
            libsql::params![
                PersonnelStatus::Available.as_str(),
                now.as_str(),
                manager_id.as_str()
            ],
        )
        .await?;

        if let Some(ref certificate_id) = site.certificate_id {
            tx.execute(
                "UPDATE certificates SET status = ?1, current_site_id = NULL, updated_at = ?2 WHERE id = ?3",
                libsql::params![
                    CertificateStatus::Available.as_str(),
                    now.as_str(),
                    certificate_id.as_str()
                ],
            )
            .await?;
        }

        tx.commit().await?;

        let site = self.get_site(site_id).await?;
        tracing::debug!(site_id, manager_id, version = site.version, "site unassigned");
        Ok(site)
    }

    /// A site with its manager and certificate summaries resolved.
    ///
    /// # Errors
    ///
    /// [`CoreError::NotFound`] when the site does not exist.
    pub async fn site_detail(&self, site_id: &str) -> Result<SiteDetail, DatabaseError> {
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

    /// Tell a missing row apart from a stale version after a guarded write
    /// changed nothing.
    async fn explain_missed_write(&self, site_id: &str, expected: Option<i64>) -> DatabaseError {
        match self.find_site(site_id).await {
            Ok(Some(site)) => {
                tracing::info!(site_id, current = site.version, ?expected, "site update rejected: version conflict");
                CoreError::VersionConflict {
                    id: site_id.to_string(),
                    current: site.version,
                    expected: expected.unwrap_or(site.version),
                }
                .into()
            }
            Ok(None) => CoreError::not_found(EntityType::Site, site_id).into(),
            Err(e) => e,
        }
    }
}
