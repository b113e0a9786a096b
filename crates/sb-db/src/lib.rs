//! # sb-db
//!
//! Local libSQL store for Siteboard: sites, personnel, and certificates.
//!
//! This is the default backend and doubles as the offline mock when opened
//! with `":memory:"`. Every site mutation is guarded by the row's `version`
//! column so concurrent editors get a conflict instead of a lost update.
//!
//! Uses the `libsql` crate (C `SQLite` fork, v0.9.29).

pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;
pub mod service;

#[cfg(test)]
mod test_support;

use error::DatabaseError;
use libsql::Builder;

/// Raw database handle: a libSQL database plus its single connection.
pub struct SiteDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl SiteDb {
    /// Open a local database at the given path, or `":memory:"`.
    ///
    /// Runs migrations automatically on open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        if path != ":memory:" {
            if let Some(parent) = std::path::Path::new(path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).map_err(|e| {
                        DatabaseError::Migration(format!("create {}: {e}", parent.display()))
                    })?;
                }
            }
        }

        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        let site_db = Self { db, conn };
        site_db.run_migrations().await?;
        tracing::debug!(path, "opened local store");
        Ok(site_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Count rows in a table.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn count(&self, table: &str) -> Result<u64, DatabaseError> {
        let mut rows = self
            .conn
            .query(&format!("SELECT COUNT(*) FROM {table}"), ())
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        let n = row.get::<i64>(0)?;
        u64::try_from(n).map_err(|_| DatabaseError::InvalidState(format!("negative count {n}")))
    }
}
