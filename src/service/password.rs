//! Salted one-way password hashing.
//!
//! Hashes are stored in PHC string format, so the salt and parameters travel
//! with the hash and verification needs no extra state.

use crate::error::AppError;
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

pub fn hash(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let hashed = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hashed.to_string())
}

/// Verify a submitted password against a stored hash. An unparseable stored
/// hash verifies as false rather than erroring; the caller treats it like a
/// wrong password.
pub fn verify(stored: &str, password: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_round_trip() {
        let stored = hash("abc12345").expect("hash");
        assert!(verify(&stored, "abc12345"));
    }

    #[test]
    fn wrong_password_fails_verification() {
        let stored = hash("abc12345").expect("hash");
        assert!(!verify(&stored, "abc12346"));
    }

    #[test]
    fn hash_is_salted_and_never_cleartext() {
        let a = hash("abc12345").expect("hash");
        let b = hash("abc12345").expect("hash");
        assert_ne!(a, b);
        assert!(!a.contains("abc12345"));
    }

    #[test]
    fn garbage_stored_hash_verifies_false() {
        assert!(!verify("not-a-phc-string", "abc12345"));
    }
}
