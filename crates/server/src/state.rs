//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::db::{Database, RepositoryError};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; gives handlers the configuration and the
/// loaded data stores.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    db: Database,
}

impl AppState {
    /// Create application state around already-opened stores.
    #[must_use]
    pub fn new(config: ServerConfig, db: Database) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, db }),
        }
    }

    /// Open the stores under `config.data_dir` and build the state.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if a data file cannot be read or parsed.
    pub async fn load(config: ServerConfig) -> Result<Self, RepositoryError> {
        let db = Database::open(&config.data_dir).await?;
        Ok(Self::new(config, db))
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the data stores.
    #[must_use]
    pub fn db(&self) -> &Database {
        &self.inner.db
    }
}
