//! Security-question password recovery handlers.

use axum::{Json, extract::State};
use serde_json::{Value, json};
use tracing::instrument;

use super::extract::Payload;
use crate::error::{AppError, Result};
use crate::models::{QuestionsRequest, ResetPasswordRequest, SecurityQuestions};
use crate::services::AuthService;
use crate::state::AppState;

/// The recovery questions for an email.
#[instrument(skip(state, request))]
pub async fn questions(
    State(state): State<AppState>,
    Payload(request): Payload<QuestionsRequest>,
) -> Result<Json<SecurityQuestions>> {
    if request.email.trim().is_empty() {
        return Err(AppError::BadRequest("Email is required".to_owned()));
    }

    let questions = AuthService::new(state.db(), &state.config().protected_username)
        .security_questions(&request.email)
        .await?;
    Ok(Json(questions))
}

/// Set a new password after answering the recovery questions.
#[instrument(skip(state, request))]
pub async fn reset(
    State(state): State<AppState>,
    Payload(request): Payload<ResetPasswordRequest>,
) -> Result<Json<Value>> {
    AuthService::new(state.db(), &state.config().protected_username)
        .reset_password(&request)
        .await?;
    Ok(Json(json!({ "message": "Password reset successfully" })))
}
