//! Admin account management commands.
//!
//! # Usage
//!
//! ```bash
//! # Create a new account and grant it admin
//! hc-cli admin create -u "Siti Aminah" -e siti@example.com -p 'Batik2024'
//!
//! # Grant admin to an existing account
//! hc-cli admin promote -e siti@example.com
//! ```
//!
//! The server keeps the data files in memory, so run these while it is
//! stopped.

use std::path::Path;

use handycraft_server::db::{Database, RepositoryError};
use handycraft_server::models::RegisterRequest;
use handycraft_server::services::{AuthError, AuthService};
use thiserror::Error;

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Data files could not be loaded.
    #[error("Failed to open data directory: {0}")]
    Database(#[from] RepositoryError),

    /// Account validation or lookup failed.
    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Register a new account and promote it to admin.
///
/// # Returns
///
/// The id of the created account.
pub async fn create_user(
    data_dir: &Path,
    protected_username: &str,
    username: &str,
    email: &str,
    password: &str,
) -> Result<String, AdminError> {
    tracing::info!("Opening data directory {}", data_dir.display());
    let db = Database::open(data_dir).await?;
    let auth = AuthService::new(&db, protected_username);

    let request = RegisterRequest {
        username: username.to_owned(),
        email: email.to_owned(),
        password: password.to_owned(),
        security_answer1: None,
        security_answer2: None,
        security_answer3: None,
    };
    let user = auth.register(&request).await?;
    let user = auth.promote(user.email.as_str()).await?;

    tracing::info!(
        "Admin user created successfully! ID: {}, Email: {}, Username: {}",
        user.user_id,
        user.email,
        user.username
    );
    tracing::warn!("Note: User has no security answers and cannot use password recovery.");

    Ok(user.user_id.to_string())
}

/// Grant admin to an existing account.
pub async fn promote_user(
    data_dir: &Path,
    protected_username: &str,
    email: &str,
) -> Result<(), AdminError> {
    let db = Database::open(data_dir).await?;
    let user = AuthService::new(&db, protected_username)
        .promote(email)
        .await?;

    tracing::info!("Promoted {} ({}) to admin", user.username, user.email);
    Ok(())
}
