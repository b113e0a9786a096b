//! Personnel repository.

use chrono::Utc;

use sb_core::entities::{NewPersonnel, Personnel};
use sb_core::enums::EntityType;
use sb_core::errors::CoreError;
use sb_core::filters::PersonnelFilter;
use sb_core::ids;
use sb_core::updates::PersonnelUpdate;

use crate::error::DatabaseError;
use crate::helpers::{date_param, get_opt_date, get_opt_string, get_u32, opt_text, parse_datetime, parse_enum};
use crate::service::SiteService;

const SELECT_COLS: &str = "id, name, role, affiliation, phone, email, certificates_held, status, \
     current_site_count, notes, hired_on, created_at, updated_at";

fn row_to_personnel(row: &libsql::Row) -> Result<Personnel, DatabaseError> {
    Ok(Personnel {
        id: row.get(0)?,
        name: row.get(1)?,
        role: row.get(2)?,
        affiliation: get_opt_string(row, 3)?,
        phone: get_opt_string(row, 4)?,
        email: get_opt_string(row, 5)?,
        certificates_held: get_opt_string(row, 6)?,
        status: parse_enum(&row.get::<String>(7)?)?,
        current_site_count: get_u32(row, 8)?,
        notes: get_opt_string(row, 9)?,
        hired_on: get_opt_date(row, 10)?,
        created_at: parse_datetime(&row.get::<String>(11)?)?,
        updated_at: parse_datetime(&row.get::<String>(12)?)?,
    })
}

pub(crate) async fn insert_personnel(
    conn: &libsql::Connection,
    person: &Personnel,
) -> Result<(), DatabaseError> {
    conn.execute(
        &format!(
            "INSERT INTO personnel ({SELECT_COLS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)"
        ),
        libsql::params_from_iter(vec![
            libsql::Value::from(person.id.as_str()),
            person.name.as_str().into(),
            person.role.as_str().into(),
            opt_text(person.affiliation.as_deref()),
            opt_text(person.phone.as_deref()),
            opt_text(person.email.as_deref()),
            opt_text(person.certificates_held.as_deref()),
            person.status.as_str().into(),
            i64::from(person.current_site_count).into(),
            opt_text(person.notes.as_deref()),
            date_param(person.hired_on),
            person.created_at.to_rfc3339().into(),
            person.updated_at.to_rfc3339().into(),
        ]),
    )
    .await?;
    Ok(())
}

impl SiteService {
    /// # Errors
    ///
    /// [`CoreError::Duplicate`] when the caller-supplied ID already exists.
    pub async fn create_personnel(&self, input: NewPersonnel) -> Result<Personnel, DatabaseError> {
        let _guard = self.lock().await;

        let id = match input.requested_id() {
            Some(requested) => {
                if self.find_personnel(requested).await?.is_some() {
                    return Err(CoreError::Duplicate {
                        entity: EntityType::Personnel,
                        id: requested.to_string(),
                    }
                    .into());
                }
                requested.to_string()
            }
            None => ids::personnel_id(),
        };

        let person = input.into_personnel(id, Utc::now());
        insert_personnel(self.db().conn(), &person).await?;
        tracing::debug!(personnel_id = %person.id, "personnel created");
        Ok(person)
    }

    /// # Errors
    ///
    /// [`CoreError::NotFound`] when no personnel has this ID.
    pub async fn get_personnel(&self, id: &str) -> Result<Personnel, DatabaseError> {
        self.find_personnel(id)
            .await?
            .ok_or_else(|| CoreError::not_found(EntityType::Personnel, id).into())
    }

    pub async fn find_personnel(&self, id: &str) -> Result<Option<Personnel>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM personnel WHERE id = ?1"),
                [id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_personnel(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn list_personnel(
        &self,
        filter: &PersonnelFilter,
    ) -> Result<Vec<Personnel>, DatabaseError> {
        let mut conditions = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(status) = filter.status {
            params.push(status.as_str().into());
            conditions.push(format!("status = ?{}", params.len()));
        }
        if let Some(ref role) = filter.role {
            params.push(role.as_str().into());
            conditions.push(format!("role = ?{}", params.len()));
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
                &format!("SELECT {SELECT_COLS} FROM personnel {where_clause} ORDER BY id ASC"),
                libsql::params_from_iter(params),
            )
            .await?;
        let mut items = Vec::new();
        while let Some(row) = rows.next().await? {
            items.push(row_to_personnel(&row)?);
        }
        Ok(items)
    }

    /// # Errors
    ///
    /// [`CoreError::NotFound`] when no personnel has this ID.
    pub async fn update_personnel(
        &self,
        id: &str,
        update: &PersonnelUpdate,
    ) -> Result<Personnel, DatabaseError> {
        let _guard = self.lock().await;

        let mut sets = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(ref name) = update.name {
            params.push(name.trim().into());
            sets.push(format!("name = ?{}", params.len()));
        }
        if let Some(ref role) = update.role {
            params.push(role.trim().into());
            sets.push(format!("role = ?{}", params.len()));
        }
        if let Some(ref affiliation) = update.affiliation {
            params.push(opt_text(affiliation.as_deref()));
            sets.push(format!("affiliation = ?{}", params.len()));
        }
        if let Some(ref phone) = update.phone {
            params.push(opt_text(phone.as_deref()));
            sets.push(format!("phone = ?{}", params.len()));
        }
        if let Some(ref email) = update.email {
            params.push(opt_text(email.as_deref()));
            sets.push(format!("email = ?{}", params.len()));
        }
        if let Some(ref held) = update.certificates_held {
            params.push(opt_text(held.as_deref()));
            sets.push(format!("certificates_held = ?{}", params.len()));
        }
        if let Some(status) = update.status {
            params.push(status.as_str().into());
            sets.push(format!("status = ?{}", params.len()));
        }
        if let Some(ref notes) = update.notes {
            params.push(opt_text(notes.as_deref()));
            sets.push(format!("notes = ?{}", params.len()));
        }
        if let Some(hired_on) = update.hired_on {
            params.push(date_param(hired_on));
            sets.push(format!("hired_on = ?{}", params.len()));
        }

        params.push(Utc::now().to_rfc3339().into());
        sets.push(format!("updated_at = ?{}", params.len()));
        params.push(id.into());
        let sql = format!(
            "UPDATE personnel SET {} WHERE id = ?{}",
            sets.join(", "),
            params.len()
        );

        let changed = self
            .db()
            .conn()
            .execute(&sql, libsql::params_from_iter(params))
            .await?;
        if changed == 0 {
            return Err(CoreError::not_found(EntityType::Personnel, id).into());
        }
        tracing::debug!(personnel_id = id, fields = ?update.changed_fields(), "personnel updated");
        self.get_personnel(id).await
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use sb_core::enums::PersonnelStatus;
    use sb_core::updates::PersonnelUpdateBuilder;

    use super::*;
    use crate::test_support::helpers::{new_manager, test_service};

    #[tokio::test]
    async fn create_and_get() {
        let svc = test_service().await;
        let created = svc.create_personnel(new_manager("Kim")).await.unwrap();
        assert!(created.id.starts_with("PRS-"));
        assert_eq!(created.current_site_count, 0);

        let fetched = svc.get_personnel(&created.id).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn duplicate_requested_id_is_rejected() {
        let svc = test_service().await;
        let mut input = new_manager("Kim");
        input.id = Some("PRS-FIXED".into());
        svc.create_personnel(input.clone()).await.unwrap();
        let err = svc.create_personnel(input).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Core(CoreError::Duplicate { .. })));
    }

    #[tokio::test]
    async fn list_filters_by_status_and_role() {
        let svc = test_service().await;
        svc.create_personnel(new_manager("Kim")).await.unwrap();
        let mut on_leave = new_manager("Park");
        on_leave.status = PersonnelStatus::OnLeave;
        svc.create_personnel(on_leave).await.unwrap();
        let mut engineer = new_manager("Lee");
        engineer.role = "engineer".into();
        svc.create_personnel(engineer).await.unwrap();

        let all = svc.list_personnel(&PersonnelFilter::default()).await.unwrap();
        assert_eq!(all.len(), 3);

        let available = svc
            .list_personnel(&PersonnelFilter {
                status: Some(PersonnelStatus::Available),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(available.len(), 2);

        let engineers = svc
            .list_personnel(&PersonnelFilter {
                role: Some("engineer".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(engineers.len(), 1);
        assert_eq!(engineers[0].name, "Lee");
    }

    #[tokio::test]
    async fn update_changes_only_given_fields() {
        let svc = test_service().await;
        let created = svc.create_personnel(new_manager("Kim")).await.unwrap();

        let update = PersonnelUpdateBuilder::new()
            .phone(Some("010-9999-0000".into()))
            .status(PersonnelStatus::OnLeave)
            .build();
        let updated = svc.update_personnel(&created.id, &update).await.unwrap();
        assert_eq!(updated.phone.as_deref(), Some("010-9999-0000"));
        assert_eq!(updated.status, PersonnelStatus::OnLeave);
        assert_eq!(updated.name, "Kim");
    }

    #[tokio::test]
    async fn update_missing_is_not_found() {
        let svc = test_service().await;
        let err = svc
            .update_personnel("PRS-NOPE", &PersonnelUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DatabaseError::Core(CoreError::NotFound {
                entity: EntityType::Personnel,
                ..
            })
        ));
    }
}
