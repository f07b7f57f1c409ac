//! Flat-file persistence for the store.
//!
//! # Data directory
//!
//! Every entity type lives in its own JSON file holding a single array:
//!
//! - `users.json` - Accounts, password hashes and recovery answers
//! - `products.json` - Catalog and per-variant inventory
//! - `orders.json` - Placed orders
//! - `feedback.json` - Product reviews
//! - `activity_logs.json` - Admin activity trail
//!
//! Each file is loaded once at startup into a [`JsonStore`]. Mutations are
//! applied to a copy of the collection, written to a temporary file, renamed
//! over the original and only then swapped into memory, so a failed write
//! never leaves memory and disk disagreeing.

pub mod activity;
pub mod feedback;
pub mod orders;
pub mod products;
pub mod users;

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::sync::{Mutex, MutexGuard};

use crate::models::{ActivityLog, Feedback, Order, Product, User};

pub use activity::ActivityRepository;
pub use feedback::FeedbackRepository;
pub use orders::OrderRepository;
pub use products::ProductRepository;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Reading or writing a backing file failed.
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A collection could not be encoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Data on disk is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl RepositoryError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// An in-memory collection mirrored to a JSON file.
///
/// One async mutex guards the whole collection, so every writer to a store is
/// serialized, including the file rewrite.
#[derive(Debug)]
pub struct JsonStore<T> {
    path: PathBuf,
    items: Mutex<Vec<T>>,
}

impl<T> JsonStore<T>
where
    T: Serialize + DeserializeOwned + Clone + Send,
{
    /// Load a store from `path`. A missing or empty file is an empty collection.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Io` if the file exists but cannot be read.
    /// Returns `RepositoryError::DataCorruption` if it is not a JSON array of `T`.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, RepositoryError> {
        let path = path.into();
        let items = load_collection(&path).await?;
        tracing::debug!(path = %path.display(), count = items.len(), "Loaded collection");

        Ok(Self {
            path,
            items: Mutex::new(items),
        })
    }

    /// A copy of the whole collection.
    pub async fn all(&self) -> Vec<T> {
        self.items.lock().await.clone()
    }

    /// Number of items.
    pub async fn len(&self) -> usize {
        self.items.lock().await.len()
    }

    /// Whether the collection is empty.
    pub async fn is_empty(&self) -> bool {
        self.items.lock().await.is_empty()
    }

    /// First item matching `predicate`.
    pub async fn find(&self, predicate: impl Fn(&T) -> bool) -> Option<T> {
        self.items.lock().await.iter().find(|item| predicate(item)).cloned()
    }

    /// All items matching `predicate`, in stored order.
    pub async fn filter(&self, predicate: impl Fn(&T) -> bool) -> Vec<T> {
        self.items
            .lock()
            .await
            .iter()
            .filter(|item| predicate(item))
            .cloned()
            .collect()
    }

    /// Take the store lock for a multi-step read-check-write.
    pub async fn lock(&self) -> StoreGuard<'_, T> {
        StoreGuard {
            path: &self.path,
            items: self.items.lock().await,
        }
    }

    /// Apply `mutate` to a copy of the collection and commit it.
    ///
    /// If `mutate` fails nothing is written. If the write fails the in-memory
    /// collection is left untouched.
    ///
    /// # Errors
    ///
    /// Returns the closure's error, or a `RepositoryError` from the commit.
    pub async fn update<R, E>(
        &self,
        mutate: impl FnOnce(&mut Vec<T>) -> Result<R, E>,
    ) -> Result<R, E>
    where
        E: From<RepositoryError>,
    {
        let mut guard = self.lock().await;
        let mut next = guard.items().to_vec();
        let output = mutate(&mut next)?;
        guard.commit(next).await?;
        Ok(output)
    }
}

/// Exclusive access to a [`JsonStore`] while held.
pub struct StoreGuard<'a, T> {
    path: &'a Path,
    items: MutexGuard<'a, Vec<T>>,
}

impl<T> StoreGuard<'_, T>
where
    T: Serialize + Clone,
{
    /// Current committed contents.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Persist `next` and make it the committed collection.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if encoding or the atomic file replace fails;
    /// the committed collection is unchanged in that case.
    pub async fn commit(&mut self, next: Vec<T>) -> Result<(), RepositoryError> {
        write_collection(self.path, &next).await?;
        *self.items = next;
        Ok(())
    }
}

/// All stores backing the application.
#[derive(Debug)]
pub struct Database {
    pub users: JsonStore<User>,
    pub products: JsonStore<Product>,
    pub orders: JsonStore<Order>,
    pub feedback: JsonStore<Feedback>,
    pub activity: JsonStore<ActivityLog>,
}

impl Database {
    /// Open every store under `data_dir`.
    ///
    /// # Errors
    ///
    /// Returns the first `RepositoryError` hit while loading a file.
    pub async fn open(data_dir: &Path) -> Result<Self, RepositoryError> {
        Ok(Self {
            users: JsonStore::open(data_dir.join("users.json")).await?,
            products: JsonStore::open(data_dir.join("products.json")).await?,
            orders: JsonStore::open(data_dir.join("orders.json")).await?,
            feedback: JsonStore::open(data_dir.join("feedback.json")).await?,
            activity: JsonStore::open(data_dir.join("activity_logs.json")).await?,
        })
    }
}

async fn load_collection<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, RepositoryError> {
    let raw = match tokio::fs::read(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(RepositoryError::io(path, e)),
    };

    if raw.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }

    serde_json::from_slice::<Option<Vec<T>>>(&raw)
        .map(Option::unwrap_or_default)
        .map_err(|e| RepositoryError::DataCorruption(format!("{}: {e}", path.display())))
}

/// Replace `path` with the JSON encoding of `items` via write-temp-then-rename.
async fn write_collection<T: Serialize>(path: &Path, items: &[T]) -> Result<(), RepositoryError> {
    let bytes = serde_json::to_vec_pretty(items)?;

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    tokio::fs::create_dir_all(&parent)
        .await
        .map_err(|e| RepositoryError::io(&parent, e))?;

    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("collection");
    let tmp = parent.join(format!(".{file_name}.tmp.{}", std::process::id()));

    let written = async {
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(&bytes).await?;
        file.sync_all().await?;
        tokio::fs::rename(&tmp, path).await
    }
    .await;

    if let Err(e) = written {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(RepositoryError::io(path, e));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Row {
        name: String,
    }

    fn row(name: &str) -> Row {
        Row {
            name: name.to_owned(),
        }
    }

    #[tokio::test]
    async fn test_missing_and_empty_files_load_empty() {
        let dir = tempfile::tempdir().unwrap();
        let missing: JsonStore<Row> = JsonStore::open(dir.path().join("nope.json")).await.unwrap();
        assert!(missing.is_empty().await);

        let blank = dir.path().join("blank.json");
        std::fs::write(&blank, "  \n").unwrap();
        let store: JsonStore<Row> = JsonStore::open(&blank).await.unwrap();
        assert!(store.is_empty().await);

        let null = dir.path().join("null.json");
        std::fs::write(&null, "null").unwrap();
        let store: JsonStore<Row> = JsonStore::open(&null).await.unwrap();
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{not json").unwrap();
        let result = JsonStore::<Row>::open(&path).await;
        assert!(matches!(result, Err(RepositoryError::DataCorruption(_))));
    }

    #[tokio::test]
    async fn test_update_persists_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("rows.json");
        let store: JsonStore<Row> = JsonStore::open(&path).await.unwrap();

        store
            .update(|rows| {
                rows.push(row("a"));
                rows.push(row("b"));
                Ok::<_, RepositoryError>(())
            })
            .await
            .unwrap();

        let reopened: JsonStore<Row> = JsonStore::open(&path).await.unwrap();
        assert_eq!(reopened.all().await, vec![row("a"), row("b")]);

        let leftovers: Vec<_> = std::fs::read_dir(path.parent().unwrap())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_name().to_string_lossy().contains(".tmp."))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[tokio::test]
    async fn test_failed_mutation_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.json");
        let store: JsonStore<Row> = JsonStore::open(&path).await.unwrap();

        let result: Result<(), RepositoryError> = store
            .update(|rows| {
                rows.push(row("ghost"));
                Err(RepositoryError::Conflict("nope".to_owned()))
            })
            .await;

        assert!(result.is_err());
        assert!(store.is_empty().await);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_failed_write_keeps_memory() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should be makes the final rename fail.
        let path = dir.path().join("rows.json");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("occupied"), "x").unwrap();

        let store = JsonStore::<Row> {
            path: path.clone(),
            items: Mutex::new(vec![row("kept")]),
        };
        let result = store
            .update(|rows| {
                rows.clear();
                Ok::<_, RepositoryError>(())
            })
            .await;

        assert!(matches!(result, Err(RepositoryError::Io { .. })));
        assert_eq!(store.all().await, vec![row("kept")]);
    }
}
