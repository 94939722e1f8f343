use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::Rng;
use tracing::{debug, warn};

use crate::shared::AppError;

/// Hashes a plain-text password with Argon2id and a random salt.
///
/// The result is a PHC string (`$argon2id$v=19$...`) that embeds the salt
/// and cost parameters, so it can be verified without extra state.
pub fn hash_password(plain: &str) -> Result<String, AppError> {
    let mut salt_bytes = [0u8; 16];
    rand::rng().fill(&mut salt_bytes);

    let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| {
        warn!(error = %e, "Failed to encode password salt");
        AppError::PasswordHash(e.to_string())
    })?;

    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            warn!(error = %e, "Failed to hash password");
            AppError::PasswordHash(e.to_string())
        })
}

/// Checks a plain-text password against a stored hash.
/// A malformed hash counts as a mismatch.
pub fn verify_password(hash: &str, plain: &str) -> bool {
    let parsed = match PasswordHash::new(hash) {
        Ok(parsed) => parsed,
        Err(e) => {
            debug!(error = %e, "Stored password hash is malformed");
            return false;
        }
    };

    Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("password123").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(!hash.contains("password123"));
        assert!(verify_password(&hash, "password123"));
    }

    #[test]
    fn test_wrong_password_does_not_verify() {
        let hash = hash_password("password123").unwrap();
        assert!(!verify_password(&hash, "wrongpassword"));
        assert!(!verify_password(&hash, ""));
    }

    #[test]
    fn test_hashes_are_salted() {
        let first = hash_password("password123").unwrap();
        let second = hash_password("password123").unwrap();

        assert_ne!(first, second);
        assert!(verify_password(&first, "password123"));
        assert!(verify_password(&second, "password123"));
    }

    #[test]
    fn test_malformed_hash_is_mismatch() {
        assert!(!verify_password("not-a-valid-hash", "password123"));
        assert!(!verify_password("", "password123"));
    }
}
