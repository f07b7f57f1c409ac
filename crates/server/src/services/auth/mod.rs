//! Authentication service.
//!
//! Provides registration, password login, role management and
//! security-question password recovery.

mod error;
pub mod password;

pub use error::AuthError;

use tracing::instrument;

use handycraft_core::{Email, Role, UserId};

use crate::db::{Database, RepositoryError, UserRepository};
use crate::models::{RegisterRequest, ResetPasswordRequest, SecurityQuestions, User, UserView};

use password::{
    generate_salt, hash_security_answer, hash_with_salt, normalize_username, validate_password,
    verify,
};

/// The fixed recovery questions, in answer order.
pub const SECURITY_QUESTIONS: SecurityQuestions = SecurityQuestions {
    question1: "What city were you born in?",
    question2: "What was the name of your first pet?",
    question3: "What is your favourite colour?",
};

/// Authentication service.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
    protected_username: &'a str,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    ///
    /// `protected_username` names the super-admin account that can neither
    /// change role nor use self-service recovery.
    #[must_use]
    pub const fn new(db: &'a Database, protected_username: &'a str) -> Self {
        Self {
            users: UserRepository::new(&db.users),
            protected_username,
        }
    }

    fn is_protected(&self, user: &User) -> bool {
        user.username == self.protected_username
    }

    // =========================================================================
    // Registration & Login
    // =========================================================================

    /// Register a new customer account.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidUsername`, `AuthError::InvalidEmail` or
    /// `AuthError::WeakPassword` for bad input,
    /// `AuthError::IncompleteSecurityAnswers` if only some answers are given,
    /// and `AuthError::UserAlreadyExists` if the email is taken.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: &RegisterRequest) -> Result<User, AuthError> {
        let username = normalize_username(&request.username)?;
        let email = Email::parse(&request.email)?;
        validate_password(&request.password)?;
        let answers = request
            .security_answers()
            .map_err(|()| AuthError::IncompleteSecurityAnswers)?;

        let salt = generate_salt();
        let (security_answer_hashes, security_salt) = match answers {
            Some(answers) => {
                let security_salt = generate_salt();
                let hashes = answers
                    .iter()
                    .map(|a| hash_security_answer(a, &security_salt))
                    .collect();
                (hashes, Some(security_salt))
            }
            None => (Vec::new(), None),
        };

        let user = User {
            user_id: UserId::new(uuid::Uuid::new_v4().to_string()),
            username,
            email,
            password_hash: hash_with_salt(&request.password, &salt),
            salt,
            role: Role::Customer,
            security_answer_hashes,
            security_salt,
        };

        let user = self.users.create(user).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
            other => AuthError::Repository(other),
        })?;

        tracing::info!(user_id = %user.user_id, "User registered");
        Ok(user)
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email is unknown or the
    /// password is wrong.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let user = self
            .users
            .get_by_email(email)
            .await
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify(password, &user.salt, &user.password_hash) {
            tracing::debug!("Password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        Ok(user)
    }

    // =========================================================================
    // Users & Roles
    // =========================================================================

    /// All accounts without credentials.
    pub async fn list_users(&self) -> Vec<UserView> {
        self.users
            .list()
            .await
            .into_iter()
            .map(UserView::from)
            .collect()
    }

    /// Change a user's role.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidRole` for an unknown role name,
    /// `AuthError::UserNotFound` for an unknown id, and
    /// `AuthError::ProtectedRole` for the protected account.
    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn update_role(&self, id: &UserId, role: &str) -> Result<User, AuthError> {
        let role: Role = role.parse()?;
        let user = self
            .users
            .get_by_id(id)
            .await
            .ok_or(AuthError::UserNotFound)?;
        if self.is_protected(&user) {
            tracing::warn!("Attempt to change protected account role");
            return Err(AuthError::ProtectedRole);
        }

        let user = self.users.set_role(id, role).await.map_err(|e| match e {
            RepositoryError::NotFound => AuthError::UserNotFound,
            other => AuthError::Repository(other),
        })?;
        tracing::info!(role = %user.role, "Role updated");
        Ok(user)
    }

    /// Grant admin to the account with this email.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if no account has this email.
    pub async fn promote(&self, email: &str) -> Result<User, AuthError> {
        self.users
            .set_role_by_email(email, Role::Admin)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => AuthError::UserNotFound,
                other => AuthError::Repository(other),
            })
    }

    // =========================================================================
    // Password Recovery
    // =========================================================================

    /// The recovery questions for an account that has answers on file.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::ProtectedRecovery` for the protected account and
    /// `AuthError::RecoveryNotSet` for unknown emails or missing answers.
    pub async fn security_questions(&self, email: &str) -> Result<SecurityQuestions, AuthError> {
        let user = self.users.get_by_email(email).await;
        match user {
            Some(user) if self.is_protected(&user) => Err(AuthError::ProtectedRecovery),
            Some(user) if user.has_security_answers() => Ok(SECURITY_QUESTIONS),
            _ => Err(AuthError::RecoveryNotSet),
        }
    }

    /// Replace a password after checking the recovery answers.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingFields`, `AuthError::PasswordMismatch` or
    /// `AuthError::WeakPassword` for bad input, `AuthError::ProtectedRecovery`
    /// for the protected account, `AuthError::RecoveryNotSet` when there is
    /// nothing to check against, and `AuthError::IncorrectAnswers` when any
    /// answer is wrong.
    #[instrument(skip(self, request))]
    pub async fn reset_password(&self, request: &ResetPasswordRequest) -> Result<(), AuthError> {
        let (
            Some(email),
            Some(answer1),
            Some(answer2),
            Some(answer3),
            Some(new_password),
            Some(confirm_password),
        ) = (
            request.email.as_deref(),
            request.answer1.as_deref(),
            request.answer2.as_deref(),
            request.answer3.as_deref(),
            request.new_password.as_deref(),
            request.confirm_password.as_deref(),
        )
        else {
            return Err(AuthError::MissingFields);
        };

        if new_password != confirm_password {
            return Err(AuthError::PasswordMismatch);
        }
        validate_password(new_password)?;

        let user = self
            .users
            .get_by_email(email)
            .await
            .ok_or(AuthError::RecoveryNotSet)?;
        if self.is_protected(&user) {
            return Err(AuthError::ProtectedRecovery);
        }
        let Some(security_salt) = user.security_salt.as_deref() else {
            return Err(AuthError::RecoveryNotSet);
        };
        if !user.has_security_answers() {
            return Err(AuthError::RecoveryNotSet);
        }

        let correct = [answer1, answer2, answer3]
            .iter()
            .zip(&user.security_answer_hashes)
            .all(|(answer, expected)| {
                verify(&answer.trim().to_lowercase(), security_salt, expected)
            });
        if !correct {
            tracing::info!(user_id = %user.user_id, "Incorrect security answers");
            return Err(AuthError::IncorrectAnswers);
        }

        let salt = generate_salt();
        let password_hash = hash_with_salt(new_password, &salt);
        self.users
            .set_password(user.email.as_str(), password_hash, salt)
            .await?;

        tracing::info!(user_id = %user.user_id, "Password reset");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const PROTECTED: &str = "David Lee";

    fn registration(username: &str, email: &str, answers: bool) -> RegisterRequest {
        let answer = |a: &str| answers.then(|| a.to_owned());
        RegisterRequest {
            username: username.to_owned(),
            email: email.to_owned(),
            password: "Secret123".to_owned(),
            security_answer1: answer("Ipoh"),
            security_answer2: answer("Comel"),
            security_answer3: answer("Green"),
        }
    }

    fn reset(email: &str, answers: [&str; 3], password: &str) -> ResetPasswordRequest {
        ResetPasswordRequest {
            email: Some(email.to_owned()),
            answer1: Some(answers[0].to_owned()),
            answer2: Some(answers[1].to_owned()),
            answer3: Some(answers[2].to_owned()),
            new_password: Some(password.to_owned()),
            confirm_password: Some(password.to_owned()),
        }
    }

    #[tokio::test]
    async fn test_register_and_login() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path()).await.unwrap();
        let auth = AuthService::new(&db, PROTECTED);

        let user = auth
            .register(&registration("  nur aisyah ", "Aisyah@Mail.MY", false))
            .await
            .unwrap();
        assert_eq!(user.username, "Nur Aisyah");
        assert_eq!(user.email.as_str(), "aisyah@mail.my");
        assert_eq!(user.role, Role::Customer);
        assert_ne!(user.password_hash, "Secret123");

        let logged_in = auth.login("AISYAH@mail.my", "Secret123").await.unwrap();
        assert_eq!(logged_in.user_id, user.user_id);
        assert!(matches!(
            auth.login("aisyah@mail.my", "Wrong1234").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.login("nobody@mail.my", "Secret123").await,
            Err(AuthError::InvalidCredentials)
        ));

        let dup = auth
            .register(&registration("Other", "aisyah@MAIL.my", false))
            .await;
        assert!(matches!(dup, Err(AuthError::UserAlreadyExists)));
    }

    #[tokio::test]
    async fn test_register_rejects_partial_answers() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path()).await.unwrap();
        let auth = AuthService::new(&db, PROTECTED);

        let mut request = registration("Ali", "ali@mail.my", true);
        request.security_answer2 = None;
        assert!(matches!(
            auth.register(&request).await,
            Err(AuthError::IncompleteSecurityAnswers)
        ));
    }

    #[tokio::test]
    async fn test_protected_account_role_is_fixed() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path()).await.unwrap();
        let auth = AuthService::new(&db, PROTECTED);

        let boss = auth
            .register(&registration("david lee", "david@mail.my", true))
            .await
            .unwrap();
        let staff = auth
            .register(&registration("Mei Ling", "mei@mail.my", false))
            .await
            .unwrap();

        assert!(matches!(
            auth.update_role(&boss.user_id, "customer").await,
            Err(AuthError::ProtectedRole)
        ));
        assert!(matches!(
            auth.update_role(&staff.user_id, "superuser").await,
            Err(AuthError::InvalidRole(_))
        ));
        assert!(matches!(
            auth.update_role(&UserId::new("missing"), "admin").await,
            Err(AuthError::UserNotFound)
        ));
        let promoted = auth.update_role(&staff.user_id, "admin").await.unwrap();
        assert!(promoted.is_admin());

        assert!(matches!(
            auth.security_questions("david@mail.my").await,
            Err(AuthError::ProtectedRecovery)
        ));
    }

    #[tokio::test]
    async fn test_password_reset() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path()).await.unwrap();
        let auth = AuthService::new(&db, PROTECTED);
        auth.register(&registration("Ali", "ali@mail.my", true))
            .await
            .unwrap();
        auth.register(&registration("Bob", "bob@mail.my", false))
            .await
            .unwrap();

        assert_eq!(
            auth.security_questions("ALI@mail.my").await.unwrap(),
            SECURITY_QUESTIONS
        );
        assert!(matches!(
            auth.security_questions("bob@mail.my").await,
            Err(AuthError::RecoveryNotSet)
        ));

        let wrong = auth
            .reset_password(&reset("ali@mail.my", ["Ipoh", "Comel", "Red"], "NewPass99"))
            .await;
        assert!(matches!(wrong, Err(AuthError::IncorrectAnswers)));

        let mut mismatch = reset("ali@mail.my", ["Ipoh", "Comel", "Green"], "NewPass99");
        mismatch.confirm_password = Some("NewPass98".to_owned());
        assert!(matches!(
            auth.reset_password(&mismatch).await,
            Err(AuthError::PasswordMismatch)
        ));

        auth.reset_password(&reset("ali@mail.my", [" ipoh", "COMEL ", "green"], "NewPass99"))
            .await
            .unwrap();
        assert!(auth.login("ali@mail.my", "NewPass99").await.is_ok());
        assert!(auth.login("ali@mail.my", "Secret123").await.is_err());
    }
}
