//! User repository over `users.json`.

use handycraft_core::{Role, UserId};

use super::{JsonStore, RepositoryError};
use crate::models::User;

/// Repository for user accounts.
pub struct UserRepository<'a> {
    store: &'a JsonStore<User>,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(store: &'a JsonStore<User>) -> Self {
        Self { store }
    }

    /// Get a user by email, ignoring case.
    pub async fn get_by_email(&self, email: &str) -> Option<User> {
        self.store.find(|u| u.email.matches(email)).await
    }

    /// Get a user by id.
    pub async fn get_by_id(&self, id: &UserId) -> Option<User> {
        self.store.find(|u| &u.user_id == id).await
    }

    /// All users in registration order.
    pub async fn list(&self) -> Vec<User> {
        self.store.all().await
    }

    pub async fn count(&self) -> usize {
        self.store.len().await
    }

    /// Insert a new user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email is already registered.
    /// Returns `RepositoryError::Io` if the file cannot be written.
    pub async fn create(&self, user: User) -> Result<User, RepositoryError> {
        self.store
            .update(|users| {
                if users.iter().any(|u| u.email.matches(user.email.as_str())) {
                    return Err(RepositoryError::Conflict("email already exists".to_owned()));
                }
                users.push(user.clone());
                Ok(user)
            })
            .await
    }

    /// Change a user's role.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no user has this id.
    pub async fn set_role(&self, id: &UserId, role: Role) -> Result<User, RepositoryError> {
        self.modify(|u| &u.user_id == id, |u| u.role = role).await
    }

    /// Change a user's role, looked up by email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no user has this email.
    pub async fn set_role_by_email(&self, email: &str, role: Role) -> Result<User, RepositoryError> {
        self.modify(|u| u.email.matches(email), |u| u.role = role)
            .await
    }

    /// Replace a user's password hash and salt.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no user has this email.
    pub async fn set_password(
        &self,
        email: &str,
        password_hash: String,
        salt: String,
    ) -> Result<User, RepositoryError> {
        self.modify(
            |u| u.email.matches(email),
            |u| {
                u.password_hash = password_hash;
                u.salt = salt;
            },
        )
        .await
    }

    async fn modify(
        &self,
        select: impl Fn(&User) -> bool,
        change: impl FnOnce(&mut User),
    ) -> Result<User, RepositoryError> {
        self.store
            .update(|users| {
                let user = users
                    .iter_mut()
                    .find(|u| select(u))
                    .ok_or(RepositoryError::NotFound)?;
                change(user);
                Ok(user.clone())
            })
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use handycraft_core::Email;

    use super::*;

    fn user(id: &str, email: &str) -> User {
        User {
            user_id: UserId::new(id),
            username: "Ali".to_owned(),
            email: Email::parse(email).unwrap(),
            password_hash: "hash".to_owned(),
            salt: "salt".to_owned(),
            role: Role::Customer,
            security_answer_hashes: Vec::new(),
            security_salt: None,
        }
    }

    #[tokio::test]
    async fn test_email_is_unique_ignoring_case() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(dir.path().join("users.json")).await.unwrap();
        let repo = UserRepository::new(&store);

        repo.create(user("u1", "ali@shop.my")).await.unwrap();
        let dup = repo.create(user("u2", "ALI@shop.my")).await;
        assert!(matches!(dup, Err(RepositoryError::Conflict(_))));
        assert_eq!(repo.count().await, 1);
        assert!(repo.get_by_email("Ali@Shop.MY").await.is_some());
    }

    #[tokio::test]
    async fn test_set_role() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(dir.path().join("users.json")).await.unwrap();
        let repo = UserRepository::new(&store);
        repo.create(user("u1", "ali@shop.my")).await.unwrap();

        let updated = repo.set_role(&UserId::new("u1"), Role::Admin).await.unwrap();
        assert!(updated.is_admin());

        let missing = repo.set_role(&UserId::new("nope"), Role::Admin).await;
        assert!(matches!(missing, Err(RepositoryError::NotFound)));
    }
}
