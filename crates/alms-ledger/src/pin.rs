use anyhow::anyhow;
use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};

use crate::error::LedgerError;

pub const PIN_LENGTH: usize = 5;

/// Format policy: exactly five ASCII digits.
pub fn is_valid_format(pin: &str) -> bool {
    pin.len() == PIN_LENGTH && pin.bytes().all(|b| b.is_ascii_digit())
}

/// Hash a PIN with Argon2id before it is persisted. The clear PIN never
/// reaches the store.
pub fn hash(pin: &str) -> Result<String, LedgerError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(pin.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| LedgerError::Store(anyhow!("pin hashing failed: {}", e)))
}

/// Verify a candidate PIN against the stored hash. Argon2 recomputes the
/// full digest either way, so nothing but the boolean is observable.
pub fn verify(candidate: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(candidate.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_policy() {
        assert!(is_valid_format("12345"));
        assert!(is_valid_format("00000"));
        assert!(!is_valid_format("1234"));
        assert!(!is_valid_format("123456"));
        assert!(!is_valid_format("12a45"));
        assert!(!is_valid_format(""));
        assert!(!is_valid_format("１２３４５")); // non-ASCII digits
    }

    #[test]
    fn hash_then_verify() {
        let h = hash("54321").unwrap();
        assert_ne!(h, "54321");
        assert!(verify("54321", &h));
        assert!(!verify("54320", &h));
    }

    #[test]
    fn verify_rejects_garbage_hash() {
        assert!(!verify("12345", "not-a-phc-string"));
    }
}
