//! Checkout and order history handlers.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::extract::{Params, Payload};
use crate::error::{AppError, Result};
use crate::models::{Order, PlaceOrderRequest, Quote};
use crate::services::OrderService;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryQuery {
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PlacedResponse {
    pub message: &'static str,
    pub order: Order,
}

/// Price the cart against current stock without reserving anything.
#[instrument(skip(state, request))]
pub async fn checkout(
    State(state): State<AppState>,
    Payload(request): Payload<PlaceOrderRequest>,
) -> Result<Json<Quote>> {
    Ok(Json(OrderService::new(state.db()).quote(&request.items).await?))
}

/// Place an order.
#[instrument(skip(state, request))]
pub async fn place(
    State(state): State<AppState>,
    Payload(request): Payload<PlaceOrderRequest>,
) -> Result<impl IntoResponse> {
    let order = OrderService::new(state.db()).place(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(PlacedResponse {
            message: "Order placed successfully",
            order,
        }),
    ))
}

/// Orders placed under `?userId=`.
pub async fn history(
    State(state): State<AppState>,
    Params(query): Params<HistoryQuery>,
) -> Result<Json<Vec<Order>>> {
    let customer = query
        .user_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("userId is required".to_owned()))?;

    Ok(Json(
        OrderService::new(state.db())
            .list_for_customer(&customer)
            .await,
    ))
}
