use chrono::Utc;

use sb_core::entities::{NewPersonnel, Personnel};
use sb_core::enums::EntityType;
use sb_core::errors::CoreError;
use sb_core::filters::PersonnelFilter;
use sb_core::ids;
use sb_core::updates::PersonnelUpdate;

use super::{is_unique_violation, patch_body};
use crate::error::SupabaseError;
use crate::{SupabaseStore, query};

const TABLE: &str = "personnel";

impl SupabaseStore {
    /// # Errors
    ///
    /// [`CoreError::Duplicate`] when the caller-supplied ID already exists.
    pub async fn create_personnel(&self, input: NewPersonnel) -> Result<Personnel, SupabaseError> {
        let id = input
            .requested_id()
            .map_or_else(ids::personnel_id, String::from);
        let person = input.into_personnel(id, Utc::now());
        match self.insert::<_, Personnel>(TABLE, &person).await {
            Ok(created) => {
                tracing::debug!(personnel_id = %created.id, "personnel created");
                Ok(created)
            }
            Err(e) if is_unique_violation(&e) => Err(CoreError::Duplicate {
                entity: EntityType::Personnel,
                id: person.id,
            }
            .into()),
            Err(e) => Err(e),
        }
    }

    /// # Errors
    ///
    /// [`CoreError::NotFound`] when no personnel has this ID.
    pub async fn get_personnel(&self, id: &str) -> Result<Personnel, SupabaseError> {
        self.find_personnel(id)
            .await?
            .ok_or_else(|| CoreError::not_found(EntityType::Personnel, id).into())
    }

    pub async fn find_personnel(&self, id: &str) -> Result<Option<Personnel>, SupabaseError> {
        self.select_one(TABLE, id).await
    }

    pub async fn list_personnel(
        &self,
        filter: &PersonnelFilter,
    ) -> Result<Vec<Personnel>, SupabaseError> {
        self.select(TABLE, &query::personnel(filter)).await
    }

    /// # Errors
    ///
    /// [`CoreError::NotFound`] when no personnel has this ID.
    pub async fn update_personnel(
        &self,
        id: &str,
        update: &PersonnelUpdate,
    ) -> Result<Personnel, SupabaseError> {
        let mut rows: Vec<Personnel> = self
            .patch(TABLE, &query::by_id(id), &patch_body(update)?)
            .await?;
        if rows.is_empty() {
            return Err(CoreError::not_found(EntityType::Personnel, id).into());
        }
        tracing::debug!(personnel_id = id, fields = ?update.changed_fields(), "personnel updated");
        Ok(rows.swap_remove(0))
    }
}
