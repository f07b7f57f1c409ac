//! Catalog import command.
//!
//! Reads a JSON array of products in the `products.json` layout and merges it
//! into the catalog, replacing entries with the same `Product ID`.
//!
//! ```bash
//! hc-cli products import seed/products.json
//! ```

use std::path::Path;

use handycraft_server::db::{Database, RepositoryError};
use handycraft_server::models::Product;
use handycraft_server::services::{ProductError, ProductService};
use thiserror::Error;

/// Errors that can occur during import.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid product file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Failed to open data directory: {0}")]
    Database(#[from] RepositoryError),

    #[error(transparent)]
    Product(#[from] ProductError),
}

/// Summary of an import run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub inserted: usize,
    pub replaced: usize,
}

/// Import products from `file` into the catalog under `data_dir`.
pub async fn import(data_dir: &Path, file: &Path) -> Result<ImportSummary, ImportError> {
    let raw = tokio::fs::read_to_string(file)
        .await
        .map_err(|source| ImportError::Read {
            path: file.display().to_string(),
            source,
        })?;
    let products: Vec<Product> = serde_json::from_str(&raw)?;
    tracing::info!("Importing {} products from {}", products.len(), file.display());

    let db = Database::open(data_dir).await?;
    let (inserted, replaced) = ProductService::new(&db).import(products).await?;

    tracing::info!(inserted, replaced, "Import complete");
    Ok(ImportSummary { inserted, replaced })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const SEED: &str = r#"[
        {"Product ID": "P1", "Category": "Textiles", "Product Name": "Batik Scarf",
         "Price (RM)": 45.5, "Description": "Hand-drawn batik", "File Name": "batik.jpg",
         "Inventory": {"Red": 5, "Blue": 2}},
        {"Product ID": "P2", "Category": "Toys", "Product Name": "Wau Kite",
         "Price (RM)": 30, "Description": "", "File Name": "wau.jpg",
         "Inventory": {"Default": 10}}
    ]"#;

    #[tokio::test]
    async fn test_import_then_reimport() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("seed.json");
        std::fs::write(&file, SEED).unwrap();
        let data_dir = dir.path().join("data");

        let first = import(&data_dir, &file).await.unwrap();
        assert_eq!(first, ImportSummary { inserted: 2, replaced: 0 });

        let second = import(&data_dir, &file).await.unwrap();
        assert_eq!(second, ImportSummary { inserted: 0, replaced: 2 });

        let db = Database::open(&data_dir).await.unwrap();
        assert_eq!(db.products.len().await, 2);
    }

    #[tokio::test]
    async fn test_import_rejects_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("seed.json");
        std::fs::write(&file, "{\"not\": \"a list\"}").unwrap();

        let result = import(dir.path(), &file).await;
        assert!(matches!(result, Err(ImportError::Parse(_))));
    }

    #[tokio::test]
    async fn test_import_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = import(dir.path(), &dir.path().join("missing.json")).await;
        assert!(matches!(result, Err(ImportError::Read { .. })));
    }
}
