//! Order placement and administration.
//!
//! Placement takes the orders lock and then the products lock, validates every
//! line item against current stock, and only then reserves stock and appends
//! the order. Both files are rewritten before either in-memory collection
//! changes, so a rejected or failed order leaves inventory untouched.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::instrument;
use uuid::Uuid;

use handycraft_core::{OrderId, OrderStatus, ParseStatusError, Price, ProductId};

use crate::db::{Database, OrderRepository, ProductRepository, RepositoryError, UserRepository};
use crate::models::{
    LineItem, LineItemRequest, Order, OrderStats, PlaceOrderRequest, Product, Quote,
    UpdateStatusRequest,
};

/// Errors from order operations.
#[derive(Debug, Error)]
pub enum OrderError {
    /// Malformed checkout request.
    #[error("{0}")]
    Validation(String),

    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// A variant cannot cover the requested quantity.
    #[error("Insufficient stock for {product_name} ({variant})")]
    InsufficientStock {
        product_name: String,
        variant: String,
        requested: u32,
        available: u32,
    },

    #[error("Order not found: {0}")]
    OrderNotFound(OrderId),

    #[error("Invalid status: {0}")]
    InvalidStatus(#[from] ParseStatusError),

    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Order service.
pub struct OrderService<'a> {
    db: &'a Database,
}

impl<'a> OrderService<'a> {
    #[must_use]
    pub const fn new(db: &'a Database) -> Self {
        Self { db }
    }

    fn orders(&self) -> OrderRepository<'a> {
        OrderRepository::new(&self.db.orders)
    }

    /// Price a checkout against the current catalog without reserving stock.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Validation` for an empty cart or zero quantities,
    /// `OrderError::ProductNotFound` or `OrderError::InsufficientStock` if the
    /// catalog cannot cover the request.
    #[instrument(skip(self, items), fields(items = items.len()))]
    pub async fn quote(&self, items: &[LineItemRequest]) -> Result<Quote, OrderError> {
        validate_items(items)?;
        let products = self.db.products.all().await;
        let items = price_and_check(&products, items)?;
        Ok(Quote {
            total_amount: order_total(&items)?,
            items,
        })
    }

    /// Place an order, reserving stock for every line item.
    ///
    /// Either the order is stored and every variant decremented, or nothing
    /// changes.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Validation`, `OrderError::ProductNotFound` or
    /// `OrderError::InsufficientStock` for requests the catalog cannot satisfy.
    /// Returns `OrderError::Repository` if persisting fails.
    #[instrument(skip(self, request), fields(customer = %request.user_id, items = request.items.len()))]
    pub async fn place(&self, request: PlaceOrderRequest) -> Result<Order, OrderError> {
        if request.customer_name.trim().is_empty() {
            return Err(OrderError::Validation("Customer name is required".to_owned()));
        }
        validate_items(&request.items)?;

        // Lock order: orders, then products.
        let mut orders = self.db.orders.lock().await;
        let mut products = self.db.products.lock().await;

        let items = price_and_check(products.items(), &request.items)?;
        let total_amount = order_total(&items)?;

        let previous_products = products.items().to_vec();
        let mut next_products = previous_products.clone();
        reserve_stock(&mut next_products, &items);

        let now = Utc::now();
        let order = Order {
            order_id: generate_order_id(now),
            user_id: request.user_id.trim().to_owned(),
            customer_name: request.customer_name.trim().to_owned(),
            address: request.address,
            phone: request.phone,
            total_amount,
            items,
            created_at: now,
            status: OrderStatus::Pending,
        };
        let mut next_orders = orders.items().to_vec();
        next_orders.push(order.clone());

        products.commit(next_products).await?;
        if let Err(e) = orders.commit(next_orders).await {
            tracing::error!(error = %e, "Order write failed, restoring inventory");
            if let Err(restore) = products.commit(previous_products).await {
                tracing::error!(error = %restore, "Failed to restore inventory file");
            }
            return Err(e.into());
        }

        tracing::info!(
            order_id = %order.order_id,
            total = %order.total_amount,
            "Order placed"
        );
        Ok(order)
    }

    /// All orders.
    pub async fn list(&self) -> Vec<Order> {
        self.orders().list().await
    }

    /// Orders placed under `customer`.
    pub async fn list_for_customer(&self, customer: &str) -> Vec<Order> {
        self.orders().list_for_customer(customer).await
    }

    /// Move an order to a new status.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::InvalidStatus` for an unknown status name and
    /// `OrderError::OrderNotFound` for an unknown order.
    #[instrument(skip(self, request), fields(order_id = %request.order_id, status = %request.status))]
    pub async fn update_status(&self, request: UpdateStatusRequest) -> Result<Order, OrderError> {
        let status: OrderStatus = request.status.parse()?;
        let order = self
            .orders()
            .set_status(&request.order_id, status)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => OrderError::OrderNotFound(request.order_id.clone()),
                other => OrderError::Repository(other),
            })?;

        tracing::info!(status = %order.status, "Order status updated");
        Ok(order)
    }

    /// Dashboard counters across products, users and orders.
    pub async fn stats(&self) -> OrderStats {
        let orders = self.orders().list().await;
        let count = |status: OrderStatus| orders.iter().filter(|o| o.status == status).count();

        OrderStats {
            total_products: ProductRepository::new(&self.db.products).count().await,
            registered_users: UserRepository::new(&self.db.users).count().await,
            total_orders: orders.len(),
            pending_orders: count(OrderStatus::Pending),
            processing_orders: count(OrderStatus::Processing),
            shipped_orders: count(OrderStatus::Shipped),
            completed_orders: count(OrderStatus::Completed),
        }
    }
}

fn validate_items(items: &[LineItemRequest]) -> Result<(), OrderError> {
    if items.is_empty() {
        return Err(OrderError::Validation("Order must contain at least one item".to_owned()));
    }
    if let Some(item) = items.iter().find(|item| item.quantity == 0) {
        return Err(OrderError::Validation(format!(
            "Quantity for {} must be at least 1",
            item.product_id
        )));
    }
    Ok(())
}

/// Resolve every line against the catalog, then check stock.
///
/// Demand for the same product and variant on several lines is summed before
/// comparing with stock. Nothing is mutated.
fn price_and_check(
    products: &[Product],
    requested: &[LineItemRequest],
) -> Result<Vec<LineItem>, OrderError> {
    let resolved = requested
        .iter()
        .map(|item| {
            products
                .iter()
                .find(|p| p.id == item.product_id)
                .map(|product| (product, item))
                .ok_or_else(|| OrderError::ProductNotFound(item.product_id.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut demand: HashMap<(&ProductId, &str), u32> = HashMap::new();
    for (product, item) in &resolved {
        let wanted = demand.entry((&product.id, item.variant())).or_insert(0);
        *wanted = wanted.saturating_add(item.quantity);
    }

    for (product, item) in &resolved {
        let variant = item.variant();
        let requested = demand.get(&(&product.id, variant)).copied().unwrap_or(0);
        if !product.inventory.can_fulfil(variant, requested) {
            let available = product.inventory.available(variant);
            tracing::debug!(
                product_id = %product.id,
                variant,
                requested,
                available,
                "Insufficient stock"
            );
            return Err(OrderError::InsufficientStock {
                product_name: product.name.clone(),
                variant: variant.to_owned(),
                requested,
                available,
            });
        }
    }

    Ok(resolved
        .into_iter()
        .map(|(product, item)| LineItem {
            product_id: product.id.clone(),
            name: product.name.clone(),
            variant: item.variant().to_owned(),
            quantity: item.quantity,
            price: product.price,
        })
        .collect())
}

/// Decrement stock for already-validated lines.
fn reserve_stock(products: &mut [Product], items: &[LineItem]) {
    for item in items {
        if let Some(product) = products.iter_mut().find(|p| p.id == item.product_id) {
            product.inventory.decrement(&item.variant, item.quantity);
        }
    }
}

/// `ORD-<unix millis>-<8 hex>`.
fn generate_order_id(now: DateTime<Utc>) -> OrderId {
    let suffix = Uuid::new_v4().simple().to_string();
    OrderId::new(format!("ORD-{}-{}", now.timestamp_millis(), &suffix[..8]))
}

/// Sum of line subtotals.
///
/// # Errors
///
/// Returns `OrderError::Validation` if a subtotal or the total overflows.
pub fn order_total(items: &[LineItem]) -> Result<Price, OrderError> {
    items
        .iter()
        .try_fold(Price::ZERO, |total, item| {
            item.subtotal().and_then(|line| total.checked_add(line))
        })
        .ok_or_else(|| OrderError::Validation("Order total is too large".to_owned()))
}
