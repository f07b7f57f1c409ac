//! Registration and login handlers.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use tracing::instrument;

use handycraft_core::{Email, Role, UserId};

use super::extract::Payload;
use crate::error::Result;
use crate::models::{LoginRequest, RegisterRequest};
use crate::services::AuthService;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub message: &'static str,
    pub user_id: UserId,
    pub username: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub message: &'static str,
    pub user_id: UserId,
    pub username: String,
    pub email: Email,
    pub role: Role,
}

/// Create a customer account.
#[instrument(skip(state, request))]
pub async fn register(
    State(state): State<AppState>,
    Payload(request): Payload<RegisterRequest>,
) -> Result<impl IntoResponse> {
    let user = AuthService::new(state.db(), &state.config().protected_username)
        .register(&request)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "Registration successful",
            user_id: user.user_id,
            username: user.username,
        }),
    ))
}

/// Check credentials and return the account the client should remember.
#[instrument(skip(state, request))]
pub async fn login(
    State(state): State<AppState>,
    Payload(request): Payload<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let user = AuthService::new(state.db(), &state.config().protected_username)
        .login(&request.email, &request.password)
        .await?;

    tracing::info!(user_id = %user.user_id, "User logged in");
    Ok(Json(LoginResponse {
        message: "Login successful",
        user_id: user.user_id,
        username: user.username,
        email: user.email,
        role: user.role,
    }))
}
