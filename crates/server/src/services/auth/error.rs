//! Authentication error types.

use thiserror::Error;

use handycraft_core::ParseStatusError;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] handycraft_core::EmailError),

    #[error("{0}")]
    InvalidUsername(String),

    /// Password breaks one of the strength rules.
    #[error("{0}")]
    WeakPassword(String),

    /// Wrong password or unknown email.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("user not found")]
    UserNotFound,

    #[error("user already exists")]
    UserAlreadyExists,

    /// Role string not recognized.
    #[error("invalid role: {0}")]
    InvalidRole(#[from] ParseStatusError),

    /// The protected account's role cannot change.
    #[error("protected account role cannot be modified")]
    ProtectedRole,

    /// The protected account cannot use self-service recovery.
    #[error("protected account recovery must be handled manually")]
    ProtectedRecovery,

    /// Some but not all recovery answers were given.
    #[error("all three security answers are required")]
    IncompleteSecurityAnswers,

    /// No such user, or no recovery answers on file.
    #[error("security answers not set up")]
    RecoveryNotSet,

    #[error("incorrect security answers")]
    IncorrectAnswers,

    #[error("all fields are required")]
    MissingFields,

    #[error("passwords do not match")]
    PasswordMismatch,

    /// Repository error.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}
