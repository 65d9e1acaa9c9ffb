//! Argon2id password hashing and verification.
//!
//! Hashes are stored as PHC strings, so the salt and parameters travel with
//! the hash.

use std::sync::OnceLock;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

/// Hash a plaintext password using Argon2id with a random salt.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored PHC hash.
///
/// Returns `Ok(false)` on mismatch; `Err` only for a malformed hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Burn roughly one verification worth of time for an unknown login
/// identifier, so response timing does not reveal whether the account exists.
pub fn verify_dummy(password: &str) {
    static DUMMY: OnceLock<Option<String>> = OnceLock::new();
    let dummy = DUMMY.get_or_init(|| hash_password("echoarty-dummy-password").ok());
    if let Some(hash) = dummy {
        let _ = verify_password(password, hash);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify() {
        let hash = hash_password("password1").expect("hashing");
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("password1", &hash).expect("verify"));
    }

    #[test]
    fn wrong_password_is_false() {
        let hash = hash_password("password1").expect("hashing");
        assert!(!verify_password("password2", &hash).expect("verify"));
    }

    #[test]
    fn stored_hash_never_contains_plaintext() {
        let hash = hash_password("password1").expect("hashing");
        assert!(!hash.contains("password1"));
        // Salted: two hashes of the same password differ.
        assert_ne!(hash, hash_password("password1").expect("hashing"));
    }

    #[test]
    fn malformed_hash_is_an_error() {
        assert!(verify_password("password1", "not-a-phc-string").is_err());
    }
}
