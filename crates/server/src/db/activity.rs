//! Activity log repository over `activity_logs.json`.

use super::{JsonStore, RepositoryError};
use crate::models::ActivityLog;

pub struct ActivityRepository<'a> {
    store: &'a JsonStore<ActivityLog>,
}

impl<'a> ActivityRepository<'a> {
    #[must_use]
    pub const fn new(store: &'a JsonStore<ActivityLog>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Vec<ActivityLog> {
        self.store.all().await
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Io` if the file cannot be written.
    pub async fn append(&self, entry: ActivityLog) -> Result<(), RepositoryError> {
        self.store
            .update(|logs| {
                logs.push(entry);
                Ok(())
            })
            .await
    }

    /// Remove every entry. Returns how many were dropped.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Io` if the file cannot be written.
    pub async fn clear(&self) -> Result<usize, RepositoryError> {
        self.store
            .update(|logs| {
                let dropped = logs.len();
                logs.clear();
                Ok(dropped)
            })
            .await
    }
}
