//! Admin console API handlers.
//!
//! Every handler takes [`RequireAdmin`], so non-admin callers get
//! `403 Access Denied.` before any work is done. Mutations are also written
//! to the activity log under the acting admin's name.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Serialize;
use tracing::instrument;

use handycraft_core::{FeedbackId, ProductId, UserId};

use super::extract::Payload;
use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::models::{
    ActivityLog, Feedback, NewActivityLog, Order, OrderStats, Product, ProductInput,
    RoleUpdateRequest, UpdateStatusRequest, UserView,
};
use crate::services::{
    ActivityService, AuthService, FeedbackService, OrderService, ProductService,
};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ClearedResponse {
    pub message: &'static str,
    pub cleared: usize,
}

// =============================================================================
// Dashboard
// =============================================================================

pub async fn stats(_admin: RequireAdmin, State(state): State<AppState>) -> Json<OrderStats> {
    Json(OrderService::new(state.db()).stats().await)
}

// =============================================================================
// Products
// =============================================================================

pub async fn list_products(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> Json<Vec<Product>> {
    Json(ProductService::new(state.db()).list().await)
}

#[instrument(skip_all, fields(admin = %admin.username))]
pub async fn create_product(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Payload(input): Payload<ProductInput>,
) -> Result<impl IntoResponse> {
    let product = ProductService::new(state.db()).create(input).await?;
    ActivityService::new(state.db())
        .record(
            &admin.username,
            "Add Product",
            format!("{} ({})", product.name, product.id),
        )
        .await;
    Ok((StatusCode::CREATED, Json(product)))
}

#[instrument(skip_all, fields(admin = %admin.username, product_id = %id))]
pub async fn update_product(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Payload(input): Payload<ProductInput>,
) -> Result<Json<Product>> {
    let product = ProductService::new(state.db()).update(&id, input).await?;
    ActivityService::new(state.db())
        .record(
            &admin.username,
            "Edit Product",
            format!("{} ({})", product.name, product.id),
        )
        .await;
    Ok(Json(product))
}

#[instrument(skip_all, fields(admin = %admin.username, product_id = %id))]
pub async fn delete_product(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<StatusCode> {
    let product = ProductService::new(state.db()).delete(&id).await?;
    ActivityService::new(state.db())
        .record(
            &admin.username,
            "Delete Product",
            format!("{} ({})", product.name, product.id),
        )
        .await;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Users
// =============================================================================

pub async fn list_users(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> Json<Vec<UserView>> {
    Json(
        AuthService::new(state.db(), &state.config().protected_username)
            .list_users()
            .await,
    )
}

#[instrument(skip_all, fields(admin = %admin.username, user_id = %id))]
pub async fn update_role(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<UserId>,
    Payload(request): Payload<RoleUpdateRequest>,
) -> Result<Json<UserView>> {
    let user = AuthService::new(state.db(), &state.config().protected_username)
        .update_role(&id, &request.role)
        .await?;
    ActivityService::new(state.db())
        .record(
            &admin.username,
            "Change Role",
            format!("{} -> {}", user.email, user.role),
        )
        .await;
    Ok(Json(UserView::from(user)))
}

// =============================================================================
// Orders
// =============================================================================

pub async fn list_orders(_admin: RequireAdmin, State(state): State<AppState>) -> Json<Vec<Order>> {
    Json(OrderService::new(state.db()).list().await)
}

#[instrument(skip_all, fields(admin = %admin.username))]
pub async fn update_order_status(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Payload(request): Payload<UpdateStatusRequest>,
) -> Result<Json<Order>> {
    let order = OrderService::new(state.db())
        .update_status(request)
        .await?;
    ActivityService::new(state.db())
        .record(
            &admin.username,
            "Update Order Status",
            format!("{} -> {}", order.order_id, order.status),
        )
        .await;
    Ok(Json(order))
}

// =============================================================================
// Activity Logs
// =============================================================================

pub async fn list_logs(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> Json<Vec<ActivityLog>> {
    Json(ActivityService::new(state.db()).list().await)
}

pub async fn add_log(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Payload(entry): Payload<NewActivityLog>,
) -> Result<impl IntoResponse> {
    let log = ActivityService::new(state.db()).add(entry).await?;
    Ok((StatusCode::CREATED, Json(log)))
}

#[instrument(skip_all, fields(admin = %admin.username))]
pub async fn clear_logs(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<ClearedResponse>> {
    let cleared = ActivityService::new(state.db()).clear().await?;
    tracing::info!(cleared, "Activity log cleared");
    Ok(Json(ClearedResponse {
        message: "Activity log cleared",
        cleared,
    }))
}

// =============================================================================
// Feedback
// =============================================================================

pub async fn list_feedback(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> Json<Vec<Feedback>> {
    Json(FeedbackService::new(state.db()).list().await)
}

#[instrument(skip_all, fields(admin = %admin.username, feedback_id = %id))]
pub async fn delete_feedback(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<FeedbackId>,
) -> Result<StatusCode> {
    let feedback = FeedbackService::new(state.db()).delete(&id).await?;
    ActivityService::new(state.db())
        .record(
            &admin.username,
            "Delete Feedback",
            format!("{} on {}", feedback.id, feedback.product_id),
        )
        .await;
    Ok(StatusCode::NO_CONTENT)
}
