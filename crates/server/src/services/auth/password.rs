//! Salted SHA-256 credential hashing and input rules.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use sha2::{Digest, Sha256};

use super::AuthError;

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;
/// Maximum password length.
pub const MAX_PASSWORD_LENGTH: usize = 15;

const MIN_USERNAME_LENGTH: usize = 2;
const MAX_USERNAME_LENGTH: usize = 20;

/// A fresh random 16-byte salt, base64 encoded.
#[must_use]
pub fn generate_salt() -> String {
    STANDARD.encode(rand::random::<[u8; 16]>())
}

/// Hex SHA-256 of the salt's bytes followed by the input's bytes.
#[must_use]
pub fn hash_with_salt(input: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// Hash a recovery answer; answers compare trimmed and lowercased.
#[must_use]
pub fn hash_security_answer(answer: &str, salt: &str) -> String {
    hash_with_salt(&answer.trim().to_lowercase(), salt)
}

/// Compare a candidate against a stored hash without short-circuiting.
#[must_use]
pub fn verify(input: &str, salt: &str, expected_hash: &str) -> bool {
    let actual = hash_with_salt(input, salt);
    actual.len() == expected_hash.len()
        && actual
            .bytes()
            .zip(expected_hash.bytes())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}

/// Check the password rules: length, digit, upper and lower case, no spaces.
///
/// # Errors
///
/// Returns `AuthError::WeakPassword` naming the first rule broken.
pub fn validate_password(password: &str) -> Result<(), AuthError> {
    let length = password.chars().count();
    if !(MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH).contains(&length) {
        return Err(AuthError::WeakPassword(format!(
            "Password must be {MIN_PASSWORD_LENGTH}-{MAX_PASSWORD_LENGTH} characters."
        )));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(AuthError::WeakPassword(
            "Password must contain at least 1 number.".to_owned(),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(AuthError::WeakPassword(
            "Password must contain at least 1 uppercase letter.".to_owned(),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(AuthError::WeakPassword(
            "Password must contain at least 1 lowercase letter.".to_owned(),
        ));
    }
    if password.chars().any(char::is_whitespace) {
        return Err(AuthError::WeakPassword(
            "Password cannot contain spaces.".to_owned(),
        ));
    }
    Ok(())
}

/// Trim, validate and title-case a display name.
///
/// # Errors
///
/// Returns `AuthError::InvalidUsername` for names outside 2-20 characters or
/// containing anything but ASCII letters and spaces.
pub fn normalize_username(raw: &str) -> Result<String, AuthError> {
    let trimmed = raw.trim();
    let length = trimmed.chars().count();
    if !(MIN_USERNAME_LENGTH..=MAX_USERNAME_LENGTH).contains(&length) {
        return Err(AuthError::InvalidUsername(format!(
            "Username must be {MIN_USERNAME_LENGTH}-{MAX_USERNAME_LENGTH} characters."
        )));
    }
    if !trimmed.chars().all(|c| c.is_ascii_alphabetic() || c == ' ') {
        return Err(AuthError::InvalidUsername(
            "Username can only contain letters and spaces.".to_owned(),
        ));
    }

    Ok(trimmed
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase()
            })
        })
        .collect::<Vec<_>>()
        .join(" "))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_matches_known_digest() {
        assert_eq!(
            hash_with_salt("", ""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        // Salt first: sha256("pass" || "word") == sha256("password").
        assert_eq!(
            hash_with_salt("word", "pass"),
            "5e884898da28047151d0e56f8dc6292773603d0d6aabbdd62a11ef721d1542d8"
        );
    }

    #[test]
    fn test_salts_are_random_and_decode_to_16_bytes() {
        let a = generate_salt();
        let b = generate_salt();
        assert_ne!(a, b);
        assert_eq!(STANDARD.decode(&a).unwrap().len(), 16);
    }

    #[test]
    fn test_verify() {
        let salt = generate_salt();
        let hash = hash_with_salt("Secret123", &salt);
        assert!(verify("Secret123", &salt, &hash));
        assert!(!verify("secret123", &salt, &hash));
        assert!(!verify("Secret123", "other", &hash));
    }

    #[test]
    fn test_security_answers_ignore_case_and_padding() {
        let salt = generate_salt();
        assert_eq!(
            hash_security_answer("  Kuala Lumpur ", &salt),
            hash_security_answer("kuala lumpur", &salt)
        );
    }

    #[test]
    fn test_password_rules() {
        assert!(validate_password("Secret123").is_ok());
        for bad in ["Sh0rt", "Waytoolong123456", "nodigitsHere", "NOLOWER123", "noupper123", "Has Space1"] {
            assert!(
                matches!(validate_password(bad), Err(AuthError::WeakPassword(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_username_normalization() {
        assert_eq!(normalize_username("  siti  NUR haliza ").unwrap(), "Siti Nur Haliza");
        assert!(normalize_username("A").is_err());
        assert!(normalize_username("R2D2").is_err());
        assert!(normalize_username(&"a".repeat(21)).is_err());
    }
}
