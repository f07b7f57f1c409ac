//! Product repository over `products.json`.

use handycraft_core::ProductId;

use super::{JsonStore, RepositoryError};
use crate::models::{Product, ProductInput};

/// Repository for catalog products.
pub struct ProductRepository<'a> {
    store: &'a JsonStore<Product>,
}

impl<'a> ProductRepository<'a> {
    #[must_use]
    pub const fn new(store: &'a JsonStore<Product>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Vec<Product> {
        self.store.all().await
    }

    pub async fn get(&self, id: &ProductId) -> Option<Product> {
        self.store.find(|p| &p.id == id).await
    }

    pub async fn count(&self) -> usize {
        self.store.len().await
    }

    /// Insert a product built by `build`.
    ///
    /// With `id` absent, the next `P<n>` id is chosen under the store lock.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if `id` is already taken.
    pub async fn create(
        &self,
        id: Option<ProductId>,
        build: impl FnOnce(ProductId) -> Product,
    ) -> Result<Product, RepositoryError> {
        self.store
            .update(|products| {
                let id = match id {
                    Some(id) if products.iter().any(|p| p.id == id) => {
                        return Err(RepositoryError::Conflict(format!(
                            "product {id} already exists"
                        )));
                    }
                    Some(id) => id,
                    None => next_product_id(products),
                };
                let product = build(id);
                products.push(product.clone());
                Ok(product)
            })
            .await
    }

    /// Apply a partial update.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no product has this id.
    pub async fn update(
        &self,
        id: &ProductId,
        input: ProductInput,
    ) -> Result<Product, RepositoryError> {
        self.store
            .update(|products| {
                let product = products
                    .iter_mut()
                    .find(|p| &p.id == id)
                    .ok_or(RepositoryError::NotFound)?;
                product.apply(input);
                Ok(product.clone())
            })
            .await
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no product has this id.
    pub async fn delete(&self, id: &ProductId) -> Result<Product, RepositoryError> {
        self.store
            .update(|products| {
                let index = products
                    .iter()
                    .position(|p| &p.id == id)
                    .ok_or(RepositoryError::NotFound)?;
                Ok(products.remove(index))
            })
            .await
    }

    /// Insert or replace products by id. Returns `(inserted, replaced)`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Io` if the file cannot be written.
    pub async fn upsert_many(
        &self,
        incoming: Vec<Product>,
    ) -> Result<(usize, usize), RepositoryError> {
        self.store
            .update(|products| {
                let (mut inserted, mut replaced) = (0, 0);
                for product in incoming {
                    if let Some(existing) = products.iter_mut().find(|p| p.id == product.id) {
                        *existing = product;
                        replaced += 1;
                    } else {
                        products.push(product);
                        inserted += 1;
                    }
                }
                Ok((inserted, replaced))
            })
            .await
    }
}

/// `P<n>` where `n` is one past the largest numeric `P` suffix in use.
#[must_use]
pub fn next_product_id(products: &[Product]) -> ProductId {
    let max = products
        .iter()
        .filter_map(|p| p.id.as_str().strip_prefix('P'))
        .filter_map(|n| n.parse::<u64>().ok())
        .max()
        .unwrap_or(0);
    ProductId::new(format!("P{}", max + 1))
}
