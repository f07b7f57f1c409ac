//! Caller identification extractors.
//!
//! The browser client sends the logged-in user's id in the `X-User-ID`
//! header. These extractors resolve it against the user store.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;

use handycraft_core::UserId;

use crate::db::UserRepository;
use crate::error::set_sentry_user;
use crate::models::User;
use crate::state::AppState;

/// Header carrying the caller's user id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Extractor that requires a known user.
///
/// # Example
///
/// ```rust,ignore
/// async fn profile(RequireUser(user): RequireUser) -> impl IntoResponse {
///     Json(UserView::from(user))
/// }
/// ```
pub struct RequireUser(pub User);

/// Extractor that requires a known user with the admin role.
pub struct RequireAdmin(pub User);

/// Error returned when the caller cannot be identified or lacks the role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRejection {
    /// No `X-User-ID` header.
    MissingUserId,
    /// The header names no known user.
    UnknownUser,
    /// Admin route called by a non-admin, or by nobody.
    AccessDenied,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::MissingUserId => (StatusCode::UNAUTHORIZED, "User ID is required"),
            Self::UnknownUser => (StatusCode::NOT_FOUND, "User not found"),
            Self::AccessDenied => (StatusCode::FORBIDDEN, "Access Denied."),
        };
        (status, Json(json!({ "message": message }))).into_response()
    }
}

fn user_id_from(parts: &Parts) -> Option<UserId> {
    parts
        .headers
        .get(USER_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(UserId::from)
}

async fn resolve(parts: &Parts, state: &AppState) -> Result<User, AuthRejection> {
    let id = user_id_from(parts).ok_or(AuthRejection::MissingUserId)?;
    let user = UserRepository::new(&state.db().users)
        .get_by_id(&id)
        .await
        .ok_or(AuthRejection::UnknownUser)?;

    set_sentry_user(&user.user_id, Some(user.email.as_str()));
    Ok(user)
}

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        resolve(parts, state).await.map(Self)
    }
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match resolve(parts, state).await {
            Ok(user) if user.is_admin() => Ok(Self(user)),
            Ok(user) => {
                tracing::warn!(user_id = %user.user_id, path = %parts.uri.path(), "Non-admin denied");
                Err(AuthRejection::AccessDenied)
            }
            Err(_) => Err(AuthRejection::AccessDenied),
        }
    }
}
