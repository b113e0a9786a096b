//! Certificate repository.

use chrono::Utc;

use sb_core::entities::{Certificate, NewCertificate};
use sb_core::enums::{CertificateStatus, EntityType};
use sb_core::errors::CoreError;
use sb_core::filters::CertificateFilter;
use sb_core::ids;
use sb_core::updates::CertificateUpdate;

use crate::error::DatabaseError;
use crate::helpers::{date_param, get_opt_date, get_opt_string, opt_text, parse_datetime, parse_enum};
use crate::service::SiteService;

const SELECT_COLS: &str = "id, name, number, owner_id, owner_name, owner_phone, issuer, \
     acquired_on, valid_until, status, current_site_id, notes, created_at, updated_at";

fn row_to_certificate(row: &libsql::Row) -> Result<Certificate, DatabaseError> {
    Ok(Certificate {
        id: row.get(0)?,
        name: row.get(1)?,
        number: get_opt_string(row, 2)?,
        owner_id: row.get(3)?,
        owner_name: row.get(4)?,
        owner_phone: get_opt_string(row, 5)?,
        issuer: get_opt_string(row, 6)?,
        acquired_on: get_opt_date(row, 7)?,
        valid_until: get_opt_date(row, 8)?,
        status: parse_enum(&row.get::<String>(9)?)?,
        current_site_id: get_opt_string(row, 10)?,
        notes: get_opt_string(row, 11)?,
        created_at: parse_datetime(&row.get::<String>(12)?)?,
        updated_at: parse_datetime(&row.get::<String>(13)?)?,
    })
}

pub(crate) async fn insert_certificate(
    conn: &libsql::Connection,
    certificate: &Certificate,
) -> Result<(), DatabaseError> {
    conn.execute(
        &format!(
            "INSERT INTO certificates ({SELECT_COLS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)"
        ),
        libsql::params_from_iter(vec![
            libsql::Value::from(certificate.id.as_str()),
            certificate.name.as_str().into(),
            opt_text(certificate.number.as_deref()),
            certificate.owner_id.as_str().into(),
            certificate.owner_name.as_str().into(),
            opt_text(certificate.owner_phone.as_deref()),
            opt_text(certificate.issuer.as_deref()),
            date_param(certificate.acquired_on),
            date_param(certificate.valid_until),
            certificate.status.as_str().into(),
            opt_text(certificate.current_site_id.as_deref()),
            opt_text(certificate.notes.as_deref()),
            certificate.created_at.to_rfc3339().into(),
            certificate.updated_at.to_rfc3339().into(),
        ]),
    )
    .await?;
    Ok(())
}

impl SiteService {
    /// Register a certificate. Both the certificate and owner IDs are generated.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the insert fails.
    pub async fn create_certificate(
        &self,
        input: NewCertificate,
    ) -> Result<Certificate, DatabaseError> {
        let _guard = self.lock().await;
        let certificate = input.into_certificate(ids::certificate_id(), ids::owner_id(), Utc::now());
        insert_certificate(self.db().conn(), &certificate).await?;
        tracing::debug!(certificate_id = %certificate.id, "certificate created");
        Ok(certificate)
    }

    /// # Errors
    ///
    /// [`CoreError::NotFound`] when no certificate has this ID.
    pub async fn get_certificate(&self, id: &str) -> Result<Certificate, DatabaseError> {
        self.find_certificate(id)
            .await?
            .ok_or_else(|| CoreError::not_found(EntityType::Certificate, id).into())
    }

    pub async fn find_certificate(&self, id: &str) -> Result<Option<Certificate>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM certificates WHERE id = ?1"),
                [id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_certificate(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn list_certificates(
        &self,
        filter: &CertificateFilter,
    ) -> Result<Vec<Certificate>, DatabaseError> {
        let available = CertificateStatus::Available.as_str();
        let (sql, params): (String, Vec<libsql::Value>) = match filter.available {
            Some(true) => (
                format!("SELECT {SELECT_COLS} FROM certificates WHERE status = ?1 ORDER BY id ASC"),
                vec![available.into()],
            ),
            Some(false) => (
                format!("SELECT {SELECT_COLS} FROM certificates WHERE status != ?1 ORDER BY id ASC"),
                vec![available.into()],
            ),
            None => (
                format!("SELECT {SELECT_COLS} FROM certificates ORDER BY id ASC"),
                Vec::new(),
            ),
        };

        let mut rows = self
            .db()
            .conn()
            .query(&sql, libsql::params_from_iter(params))
            .await?;
        let mut items = Vec::new();
        while let Some(row) = rows.next().await? {
            items.push(row_to_certificate(&row)?);
        }
        Ok(items)
    }

    /// # Errors
    ///
    /// [`CoreError::NotFound`] when no certificate has this ID.
    pub async fn update_certificate(
        &self,
        id: &str,
        update: &CertificateUpdate,
    ) -> Result<Certificate, DatabaseError> {
        let _guard = self.lock().await;

        let mut sets = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(ref name) = update.name {
            params.push(name.trim().into());
            sets.push(format!("name = ?{}", params.len()));
        }
        if let Some(ref number) = update.number {
            params.push(opt_text(number.as_deref()));
            sets.push(format!("number = ?{}", params.len()));
        }
        if let Some(ref owner_name) = update.owner_name {
            params.push(owner_name.trim().into());
            sets.push(format!("owner_name = ?{}", params.len()));
        }
        if let Some(ref phone) = update.owner_phone {
            params.push(opt_text(phone.as_deref()));
            sets.push(format!("owner_phone = ?{}", params.len()));
        }
        if let Some(ref issuer) = update.issuer {
            params.push(opt_text(issuer.as_deref()));
            sets.push(format!("issuer = ?{}", params.len()));
        }
        if let Some(date) = update.acquired_on {
            params.push(date_param(date));
            sets.push(format!("acquired_on = ?{}", params.len()));
        }
        if let Some(date) = update.valid_until {
            params.push(date_param(date));
            sets.push(format!("valid_until = ?{}", params.len()));
        }
        if let Some(status) = update.status {
            params.push(status.as_str().into());
            sets.push(format!("status = ?{}", params.len()));
        }
        if let Some(ref notes) = update.notes {
            params.push(opt_text(notes.as_deref()));
            sets.push(format!("notes = ?{}", params.len()));
        }

        params.push(Utc::now().to_rfc3339().into());
        sets.push(format!("updated_at = ?{}", params.len()));
        params.push(id.into());
        let sql = format!(
            "UPDATE certificates SET {} WHERE id = ?{}",
            sets.join(", "),
            params.len()
        );

        let changed = self
            .db()
            .conn()
            .execute(&sql, libsql::params_from_iter(params))
            .await?;
        if changed == 0 {
            return Err(CoreError::not_found(EntityType::Certificate, id).into());
        }
        tracing::debug!(certificate_id = id, fields = ?update.changed_fields(), "certificate updated");
        self.get_certificate(id).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use sb_core::updates::CertificateUpdateBuilder;

    use super::*;
    use crate::test_support::helpers::{new_certificate, test_service};

    #[tokio::test]
    async fn create_generates_both_ids() {
        let svc = test_service().await;
        let cert = svc.create_certificate(new_certificate("Lee")).await.unwrap();
        assert!(cert.id.starts_with("CERT-"));
        assert!(cert.owner_id.starts_with("O-"));
        assert_eq!(cert.status, CertificateStatus::Available);
        assert_eq!(svc.get_certificate(&cert.id).await.unwrap(), cert);
    }

    #[tokio::test]
    async fn available_filter() {
        let svc = test_service().await;
        svc.create_certificate(new_certificate("Lee")).await.unwrap();
        let mut expired = new_certificate("Choi");
        expired.status = CertificateStatus::Expired;
        svc.create_certificate(expired).await.unwrap();

        let all = svc
            .list_certificates(&CertificateFilter::default())
            .await
            .unwrap();
        assert_eq!(all.len(), 2);

        let available = svc
            .list_certificates(&CertificateFilter {
                available: Some(true),
            })
            .await
            .unwrap();
        assert_eq!(available.len(), 1);
        assert_eq!(available[0].owner_name, "Lee");

        let unavailable = svc
            .list_certificates(&CertificateFilter {
                available: Some(false),
            })
            .await
            .unwrap();
        assert_eq!(unavailable.len(), 1);
        assert_eq!(unavailable[0].status, CertificateStatus::Expired);
    }

    #[tokio::test]
    async fn update_dates_and_clear_number() {
        let svc = test_service().await;
        let mut input = new_certificate("Lee");
        input.number = Some("A-1".into());
        let cert = svc.create_certificate(input).await.unwrap();

        let until = NaiveDate::from_ymd_opt(2031, 12, 31);
        let update = CertificateUpdateBuilder::new()
            .valid_until(until)
            .number(None)
            .build();
        let updated = svc.update_certificate(&cert.id, &update).await.unwrap();
        assert_eq!(updated.valid_until, until);
        assert_eq!(updated.number, None);
        assert!(updated.updated_at >= cert.updated_at);
    }
}
