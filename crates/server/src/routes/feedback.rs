//! Review handlers.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;
use tracing::instrument;

use handycraft_core::ProductId;

use super::extract::{Params, Payload};
use crate::error::{AppError, Result};
use crate::models::{Feedback, FeedbackRequest, ProductReviews};
use crate::services::FeedbackService;
use crate::state::AppState;

/// `?productId=` (or the older `?id=`).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewsQuery {
    pub product_id: Option<ProductId>,
    pub id: Option<ProductId>,
}

/// Reviews and average rating for one product.
pub async fn index(
    State(state): State<AppState>,
    Params(query): Params<ReviewsQuery>,
) -> Result<Json<ProductReviews>> {
    let product_id = query
        .product_id
        .or(query.id)
        .filter(|id| !id.as_str().trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Product ID is required".to_owned()))?;

    Ok(Json(
        FeedbackService::new(state.db())
            .for_product(&product_id)
            .await,
    ))
}

/// Submit a review for a received product.
#[instrument(skip(state, request))]
pub async fn submit(
    State(state): State<AppState>,
    Payload(request): Payload<FeedbackRequest>,
) -> Result<impl IntoResponse> {
    let feedback: Feedback = FeedbackService::new(state.db()).submit(request).await?;
    Ok((StatusCode::CREATED, Json(feedback)))
}
