//! Orders, line items and checkout payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use handycraft_core::{DEFAULT_VARIANT, OrderId, OrderStatus, Price, ProductId};

/// A placed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_id: OrderId,
    /// Customer identity given at checkout, normally the account email.
    pub user_id: String,
    pub customer_name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
    pub items: Vec<LineItem>,
    pub total_amount: Price,
    #[serde(rename = "orderDate")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub status: OrderStatus,
}

impl Order {
    /// Whether any line item is for `product_id`.
    #[must_use]
    pub fn contains_product(&self, product_id: &ProductId) -> bool {
        self.items.iter().any(|item| &item.product_id == product_id)
    }

    /// Whether the order belongs to `customer` (case-insensitive).
    #[must_use]
    pub fn belongs_to(&self, customer: &str) -> bool {
        self.user_id.trim().to_lowercase() == customer.trim().to_lowercase()
    }
}

/// A priced line item on an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(rename = "id", alias = "productId")]
    pub product_id: ProductId,
    pub name: String,
    pub variant: String,
    pub quantity: u32,
    /// Unit price at the time of purchase.
    pub price: Price,
}

impl LineItem {
    /// Unit price times quantity, or `None` if it does not fit a `Decimal`.
    #[must_use]
    pub fn subtotal(&self) -> Option<Price> {
        self.price.checked_times(self.quantity)
    }
}

/// A line item as submitted by the client.
///
/// Client-side names and prices are ignored; both come from the catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct LineItemRequest {
    #[serde(rename = "id", alias = "productId")]
    pub product_id: ProductId,
    #[serde(default)]
    pub variant: Option<String>,
    pub quantity: u32,
}

impl LineItemRequest {
    /// Requested variant, falling back to [`DEFAULT_VARIANT`] when blank.
    #[must_use]
    pub fn variant(&self) -> &str {
        self.variant
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_VARIANT)
    }
}

/// Checkout payload for both quoting and placing an order.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub items: Vec<LineItemRequest>,
}

/// Priced preview of a checkout.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub items: Vec<LineItem>,
    pub total_amount: Price,
}

/// Admin status change payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    pub order_id: OrderId,
    pub status: String,
}

/// Dashboard counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStats {
    pub total_products: usize,
    pub registered_users: usize,
    pub total_orders: usize,
    pub pending_orders: usize,
    pub processing_orders: usize,
    pub shipped_orders: usize,
    pub completed_orders: usize,
}
