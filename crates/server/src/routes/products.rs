//! Public catalog handlers.

use axum::{
    Json,
    extract::{Path, State},
};

use handycraft_core::ProductId;

use crate::error::Result;
use crate::models::Product;
use crate::services::ProductService;
use crate::state::AppState;

/// List every product.
pub async fn index(State(state): State<AppState>) -> Json<Vec<Product>> {
    Json(ProductService::new(state.db()).list().await)
}

/// Get one product.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>> {
    Ok(Json(ProductService::new(state.db()).get(&id).await?))
}
