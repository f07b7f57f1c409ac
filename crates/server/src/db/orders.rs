//! Order repository over `orders.json`.
//!
//! Placement is not here: it spans the product store too and lives in
//! [`crate::services::orders`].

use handycraft_core::{OrderId, OrderStatus, ProductId};

use super::{JsonStore, RepositoryError};
use crate::models::Order;

/// Repository for placed orders.
pub struct OrderRepository<'a> {
    store: &'a JsonStore<Order>,
}

impl<'a> OrderRepository<'a> {
    #[must_use]
    pub const fn new(store: &'a JsonStore<Order>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Vec<Order> {
        self.store.all().await
    }

    /// Orders placed under `customer`, compared case-insensitively.
    pub async fn list_for_customer(&self, customer: &str) -> Vec<Order> {
        self.store.filter(|o| o.belongs_to(customer)).await
    }

    /// Whether `customer` has a completed order containing `product_id`.
    pub async fn has_completed_purchase(&self, customer: &str, product_id: &ProductId) -> bool {
        self.store
            .find(|o| {
                o.status == OrderStatus::Completed
                    && o.belongs_to(customer)
                    && o.contains_product(product_id)
            })
            .await
            .is_some()
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no order has this id.
    pub async fn set_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<Order, RepositoryError> {
        self.store
            .update(|orders| {
                let order = orders
                    .iter_mut()
                    .find(|o| &o.order_id == id)
                    .ok_or(RepositoryError::NotFound)?;
                order.status = status;
                Ok(order.clone())
            })
            .await
    }
}
