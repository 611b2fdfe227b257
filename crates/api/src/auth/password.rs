//! Argon2id password hashing and verification.
//!
//! All password hashes use the Argon2id variant with a random salt from
//! [`OsRng`]. The PHC string format is stored so the parameters and salt
//! travel with the hash.

use std::sync::LazyLock;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

/// Hash with the same parameters as stored ones, checked when no account
/// matches so an unknown email costs the same Argon2 run as a known one.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("cinecritic-unknown-account").ok());

/// Hash a plaintext password using Argon2id with a random salt.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored PHC-formatted hash.
///
/// Returns `Ok(false)` on mismatch; `Err` only for a malformed stored hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Run a full verification against [`DUMMY_HASH`] and discard the result.
pub fn verify_dummy_password(password: &str) {
    if let Some(hash) = DUMMY_HASH.as_deref() {
        let _ = verify_password(password, hash);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify() {
        let hash = hash_password("secret12").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("secret12", &hash).unwrap());
    }

    #[test]
    fn wrong_password_is_false_not_error() {
        let hash = hash_password("secret12").unwrap();
        assert!(!verify_password("secret13", &hash).unwrap());
    }

    #[test]
    fn same_password_hashes_differently() {
        assert_ne!(hash_password("secret12").unwrap(), hash_password("secret12").unwrap());
    }

    #[test]
    fn dummy_hash_is_a_real_argon2id_hash() {
        let hash = DUMMY_HASH.as_deref().unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(!verify_password("secret12", hash).unwrap());
        verify_dummy_password("secret12");
    }

    #[test]
    fn malformed_stored_hash_is_error() {
        assert!(verify_password("secret12", "not-a-phc-string").is_err());
    }
}
