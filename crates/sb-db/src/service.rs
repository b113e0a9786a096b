//! Service layer owning the database and serializing mutations.
//!
//! All repo methods are implemented as `impl SiteService` blocks in
//! [`crate::repos`]. Reads run directly on the connection; every mutation
//! first takes the write lock so that read-check-write sequences (version
//! checks, assignment validation) observe a stable row.

use tokio::sync::{Mutex, MutexGuard};

use crate::SiteDb;
use crate::error::DatabaseError;

pub struct SiteService {
    db: SiteDb,
    write_lock: Mutex<()>,
}

impl SiteService {
    /// Open a local store at `path` (`":memory:"` for the offline mock).
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(path: &str) -> Result<Self, DatabaseError> {
        let db = SiteDb::open_local(path).await?;
        Ok(Self::from_db(db))
    }

    #[must_use]
    pub fn from_db(db: SiteDb) -> Self {
        Self {
            db,
            write_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub const fn db(&self) -> &SiteDb {
        &self.db
    }

    pub(crate) async fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().await
    }

    /// Whether all three tables are empty.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if a count query fails.
    pub async fn is_empty(&self) -> Result<bool, DatabaseError> {
        for table in ["sites", "personnel", "certificates"] {
            if self.db.count(table).await? > 0 {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
