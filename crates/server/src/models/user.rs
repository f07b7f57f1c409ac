//! Accounts and authentication payloads.

use serde::{Deserialize, Serialize};

use handycraft_core::{Email, Role, UserId};

/// A stored user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: UserId,
    pub username: String,
    pub email: Email,
    /// Hex SHA-256 of `salt || password`.
    pub password_hash: String,
    /// Base64 16-byte salt.
    #[serde(default)]
    pub salt: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub security_answer_hashes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_salt: Option<String>,
}

impl User {
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Whether all three recovery answers are on file.
    #[must_use]
    pub fn has_security_answers(&self) -> bool {
        self.security_answer_hashes.len() == 3 && self.security_salt.is_some()
    }
}

/// A user with credentials stripped, safe to return to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub user_id: UserId,
    pub username: String,
    pub email: Email,
    pub role: Role,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.user_id.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            user_id: user.user_id,
            username: user.username,
            email: user.email,
            role: user.role,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub security_answer1: Option<String>,
    pub security_answer2: Option<String>,
    pub security_answer3: Option<String>,
}

impl RegisterRequest {
    /// The three recovery answers, if every one was given and non-blank.
    ///
    /// Returns `Err(())` when only some were supplied.
    #[allow(clippy::result_unit_err)]
    pub fn security_answers(&self) -> Result<Option<[&str; 3]>, ()> {
        let answers = [
            self.security_answer1.as_deref(),
            self.security_answer2.as_deref(),
            self.security_answer3.as_deref(),
        ]
        .map(|a| a.map(str::trim).filter(|a| !a.is_empty()));

        match answers {
            [Some(a), Some(b), Some(c)] => Ok(Some([a, b, c])),
            [None, None, None] => Ok(None),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuestionsRequest {
    #[serde(default)]
    pub email: String,
}

/// The fixed recovery questions, keyed `question1`..`question3`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecurityQuestions {
    pub question1: &'static str,
    pub question2: &'static str,
    pub question3: &'static str,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub email: Option<String>,
    pub answer1: Option<String>,
    pub answer2: Option<String>,
    pub answer3: Option<String>,
    pub new_password: Option<String>,
    pub confirm_password: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoleUpdateRequest {
    pub role: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn register(answers: [Option<&str>; 3]) -> RegisterRequest {
        RegisterRequest {
            username: "Mei Ling".to_owned(),
            email: "mei@shop.my".to_owned(),
            password: "Secret123".to_owned(),
            security_answer1: answers[0].map(str::to_owned),
            security_answer2: answers[1].map(str::to_owned),
            security_answer3: answers[2].map(str::to_owned),
        }
    }

    #[test]
    fn test_security_answers_all_or_nothing() {
        assert_eq!(register([None, None, None]).security_answers(), Ok(None));
        assert_eq!(
            register([Some(" Ipoh "), Some("Tabby"), Some("Blue")]).security_answers(),
            Ok(Some(["Ipoh", "Tabby", "Blue"]))
        );
        assert!(register([Some("Ipoh"), None, Some("  ")]).security_answers().is_err());
    }

    #[test]
    fn test_view_omits_credentials() {
        let user: User = serde_json::from_str(
            r#"{"userId": "u1", "username": "Ali", "email": "ali@x.my",
                "passwordHash": "abc", "salt": "s", "role": "user"}"#,
        )
        .unwrap();
        assert_eq!(user.role, Role::Customer);
        assert!(!user.has_security_answers());

        let view = serde_json::to_value(UserView::from(&user)).unwrap();
        assert_eq!(view["role"], "customer");
        assert!(view.get("passwordHash").is_none());
        assert!(view.get("salt").is_none());
    }
}
