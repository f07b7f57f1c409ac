//! Catalog administration.

use thiserror::Error;
use tracing::instrument;

use handycraft_core::ProductId;

use crate::db::{Database, ProductRepository, RepositoryError};
use crate::models::{Product, ProductInput};

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("{0}")]
    Validation(String),

    #[error("Product not found: {0}")]
    NotFound(ProductId),

    #[error("Product {0} already exists")]
    AlreadyExists(ProductId),

    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Product service.
pub struct ProductService<'a> {
    products: ProductRepository<'a>,
}

impl<'a> ProductService<'a> {
    #[must_use]
    pub const fn new(db: &'a Database) -> Self {
        Self {
            products: ProductRepository::new(&db.products),
        }
    }

    pub async fn list(&self) -> Vec<Product> {
        self.products.list().await
    }

    /// # Errors
    ///
    /// Returns `ProductError::NotFound` if no product has this id.
    pub async fn get(&self, id: &ProductId) -> Result<Product, ProductError> {
        self.products
            .get(id)
            .await
            .ok_or_else(|| ProductError::NotFound(id.clone()))
    }

    /// Add a product. The id is generated unless the input carries one.
    ///
    /// # Errors
    ///
    /// Returns `ProductError::Validation` without a name or price, or with a
    /// negative price. Returns `ProductError::AlreadyExists` for a taken id.
    #[instrument(skip(self, input))]
    pub async fn create(&self, input: ProductInput) -> Result<Product, ProductError> {
        let name = input
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| ProductError::Validation("Product name is required".to_owned()))?
            .to_owned();
        let price = input
            .price
            .ok_or_else(|| ProductError::Validation("Price is required".to_owned()))?;
        if price.is_negative() {
            return Err(ProductError::Validation("Price cannot be negative".to_owned()));
        }

        let requested_id = input
            .id
            .clone()
            .filter(|id| !id.as_str().trim().is_empty());
        let product = self
            .products
            .create(requested_id.clone(), |id| Product {
                id,
                category: input.category.unwrap_or_default(),
                name,
                price,
                description: input.description.unwrap_or_default(),
                image: input.image.unwrap_or_default(),
                inventory: input.inventory.unwrap_or_default(),
            })
            .await
            .map_err(|e| match (e, requested_id) {
                (RepositoryError::Conflict(_), Some(id)) => ProductError::AlreadyExists(id),
                (other, _) => ProductError::Repository(other),
            })?;

        tracing::info!(product_id = %product.id, "Product created");
        Ok(product)
    }

    /// Change only the fields present in `input`.
    ///
    /// # Errors
    ///
    /// Returns `ProductError::NotFound` for an unknown id and
    /// `ProductError::Validation` for a blank name or negative price.
    #[instrument(skip(self, input), fields(product_id = %id))]
    pub async fn update(&self, id: &ProductId, input: ProductInput) -> Result<Product, ProductError> {
        if input.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(ProductError::Validation("Product name cannot be blank".to_owned()));
        }
        if input.price.is_some_and(|p| p.is_negative()) {
            return Err(ProductError::Validation("Price cannot be negative".to_owned()));
        }

        self.products.update(id, input).await.map_err(|e| match e {
            RepositoryError::NotFound => ProductError::NotFound(id.clone()),
            other => ProductError::Repository(other),
        })
    }

    /// # Errors
    ///
    /// Returns `ProductError::NotFound` for an unknown id.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete(&self, id: &ProductId) -> Result<Product, ProductError> {
        self.products.delete(id).await.map_err(|e| match e {
            RepositoryError::NotFound => ProductError::NotFound(id.clone()),
            other => ProductError::Repository(other),
        })
    }

    /// Merge `products` into the catalog, replacing same-id entries.
    ///
    /// # Errors
    ///
    /// Returns `ProductError::Validation` if any product has a blank id or name
    /// or a negative price; nothing is written in that case.
    pub async fn import(&self, products: Vec<Product>) -> Result<(usize, usize), ProductError> {
        if let Some(bad) = products.iter().find(|p| {
            p.id.as_str().trim().is_empty() || p.name.trim().is_empty() || p.price.is_negative()
        }) {
            return Err(ProductError::Validation(format!(
                "Invalid product in import: '{}'",
                bad.id
            )));
        }
        Ok(self.products.upsert_many(products).await?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use handycraft_core::Price;

    use super::*;

    fn input(json: &str) -> ProductInput {
        serde_json::from_str(json).unwrap()
    }

    #[tokio::test]
    async fn test_create_generates_sequential_ids() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path()).await.unwrap();
        let service = ProductService::new(&db);

        let a = service
            .create(input(r#"{"Product Name": "Wau", "Price (RM)": 30, "Inventory": {"Default": 4}}"#))
            .await
            .unwrap();
        let b = service
            .create(input(r#"{"name": "Keris", "price": 250.5}"#))
            .await
            .unwrap();
        assert_eq!(a.id.as_str(), "P1");
        assert_eq!(b.id.as_str(), "P2");
        assert_eq!(b.price, Price::from_sen(25050));
        assert_eq!(a.inventory.available("Default"), 4);
    }

    #[tokio::test]
    async fn test_create_validation() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path()).await.unwrap();
        let service = ProductService::new(&db);

        assert!(matches!(
            service.create(input(r#"{"price": 1}"#)).await,
            Err(ProductError::Validation(_))
        ));
        assert!(matches!(
            service.create(input(r#"{"name": "Wau", "price": -1}"#)).await,
            Err(ProductError::Validation(_))
        ));

        service
            .create(input(r#"{"id": "X1", "name": "Wau", "price": 1}"#))
            .await
            .unwrap();
        assert!(matches!(
            service.create(input(r#"{"id": "X1", "name": "Wau", "price": 1}"#)).await,
            Err(ProductError::AlreadyExists(_))
        ));
    }

    #[tokio::test]
    async fn test_update_and_delete_unknown() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path()).await.unwrap();
        let service = ProductService::new(&db);
        let missing = ProductId::new("P9");

        assert!(matches!(
            service.update(&missing, input("{}")).await,
            Err(ProductError::NotFound(_))
        ));
        assert!(matches!(
            service.delete(&missing).await,
            Err(ProductError::NotFound(_))
        ));
    }
}
