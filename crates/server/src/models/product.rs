//! Catalog products.

use serde::{Deserialize, Serialize};

use handycraft_core::{Inventory, Price, ProductId};

/// A catalog product with per-variant stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "Product ID")]
    pub id: ProductId,
    #[serde(rename = "Category", default)]
    pub category: String,
    #[serde(rename = "Product Name")]
    pub name: String,
    #[serde(rename = "Price (RM)")]
    pub price: Price,
    #[serde(rename = "Description", default)]
    pub description: String,
    /// Image file name under the static directory.
    #[serde(rename = "File Name", default)]
    pub image: String,
    #[serde(rename = "Inventory", default)]
    pub inventory: Inventory,
}

/// Admin create/update payload.
///
/// Every field is optional so the same shape serves a partial update; on
/// create, `name` and `price` are required by the service.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductInput {
    #[serde(rename = "Product ID", alias = "id")]
    pub id: Option<ProductId>,
    #[serde(rename = "Category", alias = "category")]
    pub category: Option<String>,
    #[serde(rename = "Product Name", alias = "name")]
    pub name: Option<String>,
    #[serde(rename = "Price (RM)", alias = "price")]
    pub price: Option<Price>,
    #[serde(rename = "Description", alias = "description")]
    pub description: Option<String>,
    #[serde(rename = "File Name", alias = "image")]
    pub image: Option<String>,
    #[serde(rename = "Inventory", alias = "inventory")]
    pub inventory: Option<Inventory>,
}

impl Product {
    /// Overwrite the fields present in `input`. The id never changes.
    pub fn apply(&mut self, input: ProductInput) {
        if let Some(category) = input.category {
            self.category = category;
        }
        if let Some(name) = input.name {
            self.name = name;
        }
        if let Some(price) = input.price {
            self.price = price;
        }
        if let Some(description) = input.description {
            self.description = description;
        }
        if let Some(image) = input.image {
            self.image = image;
        }
        if let Some(inventory) = input.inventory {
            self.inventory = inventory;
        }
    }
}
