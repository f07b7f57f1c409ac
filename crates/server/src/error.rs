//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server errors to Sentry
//! before responding to the client. All route handlers return
//! `Result<T, AppError>`; every error body is `{"message": "..."}`.

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::{AuthError, FeedbackError, OrderError, ProductError};

/// Message returned for every 500.
const INTERNAL_MESSAGE: &str = "Internal server error";

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Persistence failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    #[error("Product error: {0}")]
    Product(#[from] ProductError),

    #[error("Feedback error: {0}")]
    Feedback(#[from] FeedbackError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Caller is not identified.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Caller lacks the required role.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether this error is the server's fault.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Database(
                RepositoryError::Io { .. }
                    | RepositoryError::Serialization(_)
                    | RepositoryError::DataCorruption(_)
            ) | Self::Auth(AuthError::Repository(_))
                | Self::Order(OrderError::Repository(_))
                | Self::Product(ProductError::Repository(_))
                | Self::Feedback(FeedbackError::Repository(_))
                | Self::Internal(_)
        )
    }

    /// HTTP status and client-facing message.
    fn status_and_message(&self) -> (StatusCode, String) {
        if self.is_server_error() {
            return (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE.to_owned());
        }

        match self {
            Self::Database(err) => match err {
                RepositoryError::NotFound => (StatusCode::NOT_FOUND, "Not found".to_owned()),
                RepositoryError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
                _ => (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE.to_owned()),
            },
            Self::Auth(err) => auth_status(err),
            Self::Order(err) => {
                let status = match err {
                    OrderError::ProductNotFound(_) | OrderError::OrderNotFound(_) => {
                        StatusCode::NOT_FOUND
                    }
                    OrderError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
                    _ => StatusCode::BAD_REQUEST,
                };
                (status, err.to_string())
            }
            Self::Product(err) => {
                let status = match err {
                    ProductError::Validation(_) => StatusCode::BAD_REQUEST,
                    ProductError::NotFound(_) => StatusCode::NOT_FOUND,
                    ProductError::AlreadyExists(_) => StatusCode::CONFLICT,
                    ProductError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, err.to_string())
            }
            Self::Feedback(err) => match err {
                FeedbackError::NotVerified => (
                    StatusCode::FORBIDDEN,
                    "Only customers who have purchased and received this item can leave a review."
                        .to_owned(),
                ),
                FeedbackError::NotFound(_) => (StatusCode::NOT_FOUND, err.to_string()),
                FeedbackError::AlreadyExists(_) => (StatusCode::CONFLICT, err.to_string()),
                _ => (StatusCode::BAD_REQUEST, err.to_string()),
            },
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Self::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            Self::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE.to_owned()),
        }
    }
}

fn auth_status(err: &AuthError) -> (StatusCode, String) {
    let (status, message) = match err {
        AuthError::InvalidEmail(_) => (StatusCode::BAD_REQUEST, "Invalid email address"),
        AuthError::InvalidUsername(msg) | AuthError::WeakPassword(msg) => {
            return (StatusCode::BAD_REQUEST, msg.clone());
        }
        AuthError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "Invalid email or password."),
        AuthError::UserNotFound => (StatusCode::NOT_FOUND, "User not found"),
        AuthError::UserAlreadyExists => (
            StatusCode::CONFLICT,
            "An account with this email already exists",
        ),
        AuthError::InvalidRole(_) => (StatusCode::BAD_REQUEST, "Invalid role"),
        AuthError::ProtectedRole => (
            StatusCode::FORBIDDEN,
            "Access Denied: The Super Admin role cannot be modified.",
        ),
        AuthError::ProtectedRecovery => (
            StatusCode::FORBIDDEN,
            "Access Denied: Super Admin recovery must be handled manually.",
        ),
        AuthError::IncompleteSecurityAnswers => (
            StatusCode::BAD_REQUEST,
            "Please answer all three security questions",
        ),
        AuthError::RecoveryNotSet => (
            StatusCode::NOT_FOUND,
            "User not found or security answers not set up",
        ),
        AuthError::IncorrectAnswers => (StatusCode::UNAUTHORIZED, "Incorrect security answers"),
        AuthError::MissingFields => (StatusCode::BAD_REQUEST, "All fields are required"),
        AuthError::PasswordMismatch => (StatusCode::BAD_REQUEST, "Passwords do not match"),
        AuthError::Repository(_) => (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE),
    };
    (status, message.to_owned())
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let (status, message) = self.status_and_message();
        (status, Json(json!({ "message": message }))).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context for the identified caller.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::to_bytes;
    use handycraft_core::{FeedbackId, OrderId, ProductId};

    use super::*;

    fn status(err: impl Into<AppError>) -> StatusCode {
        err.into().into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("product-123".to_string());
        assert_eq!(err.to_string(), "Not found: product-123");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(status(AppError::NotFound("x".into())), StatusCode::NOT_FOUND);
        assert_eq!(status(AppError::Forbidden("x".into())), StatusCode::FORBIDDEN);
        assert_eq!(status(AppError::BadRequest("x".into())), StatusCode::BAD_REQUEST);
        assert_eq!(
            status(AppError::Internal("x".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(status(AuthError::InvalidCredentials), StatusCode::UNAUTHORIZED);
        assert_eq!(status(AuthError::UserAlreadyExists), StatusCode::CONFLICT);
        assert_eq!(status(AuthError::ProtectedRole), StatusCode::FORBIDDEN);
        assert_eq!(status(AuthError::RecoveryNotSet), StatusCode::NOT_FOUND);
        assert_eq!(
            status(OrderError::ProductNotFound(ProductId::new("P9"))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status(OrderError::OrderNotFound(OrderId::new("ORD-1"))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status(OrderError::InsufficientStock {
                product_name: "Wau".into(),
                variant: "Red".into(),
                requested: 2,
                available: 1,
            }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status(ProductError::AlreadyExists(ProductId::new("P1"))),
            StatusCode::CONFLICT
        );
        assert_eq!(status(FeedbackError::NotVerified), StatusCode::FORBIDDEN);
        assert_eq!(
            status(FeedbackError::AlreadyExists(FeedbackId::new("fb-1"))),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status(OrderError::Repository(RepositoryError::DataCorruption("x".into()))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_body_is_json_message() {
        let response = AppError::from(OrderError::InsufficientStock {
            product_name: "Batik Scarf".into(),
            variant: "Red".into(),
            requested: 4,
            available: 2,
        })
        .into_response();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["message"], "Insufficient stock for Batik Scarf (Red)");
    }

    #[tokio::test]
    async fn test_internal_details_are_hidden() {
        let response = AppError::Internal("disk on fire".into()).into_response();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["message"], INTERNAL_MESSAGE);
    }
}
