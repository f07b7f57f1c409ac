//! Admin activity trail.

use chrono::Local;

use crate::db::{ActivityRepository, Database, RepositoryError};
use crate::models::{ActivityLog, NewActivityLog};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub struct ActivityService<'a> {
    logs: ActivityRepository<'a>,
}

impl<'a> ActivityService<'a> {
    #[must_use]
    pub const fn new(db: &'a Database) -> Self {
        Self {
            logs: ActivityRepository::new(&db.activity),
        }
    }

    pub async fn list(&self) -> Vec<ActivityLog> {
        self.logs.list().await
    }

    /// Append a client-submitted entry.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the log cannot be written.
    pub async fn add(&self, entry: NewActivityLog) -> Result<ActivityLog, RepositoryError> {
        let log = ActivityLog {
            username: entry.username,
            action: entry.action,
            details: entry.details,
            timestamp: entry
                .timestamp
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(now),
        };
        self.logs.append(log.clone()).await?;
        Ok(log)
    }

    /// Record an admin mutation performed through the API.
    ///
    /// Failures are logged, not returned.
    pub async fn record(&self, username: &str, action: &str, details: impl Into<String>) {
        let log = ActivityLog {
            username: username.to_owned(),
            action: action.to_owned(),
            details: details.into(),
            timestamp: now(),
        };
        if let Err(e) = self.logs.append(log).await {
            tracing::warn!(error = %e, action, "Failed to record admin activity");
        }
    }

    /// # Errors
    ///
    /// Returns `RepositoryError` if the log cannot be written.
    pub async fn clear(&self) -> Result<usize, RepositoryError> {
        self.logs.clear().await
    }
}

fn now() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}
