//! Password hashing.
//!
//! Argon2id with a random salt per hash, encoded as a PHC string
//! (`$argon2id$v=19$...`). Both functions are CPU-bound; async callers should
//! run them on the blocking pool.

use std::sync::LazyLock;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use super::AuthError;

/// Hash of a throwaway password. Logins for unknown emails verify against it
/// so they cost the same as a wrong password.
static DUMMY_HASH: LazyLock<String> =
    LazyLock::new(|| hash_password("repurpose-unknown-account").unwrap_or_default());

/// Hash a password.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if the underlying primitive fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a stored hash.
///
/// Any failure, including an unparseable hash, counts as a mismatch.
#[must_use]
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Verify against the stored hash, or the dummy hash when there is none.
///
/// Always returns `false` when `hash` is `None`.
#[must_use]
pub fn verify_password_or_dummy(password: &str, hash: Option<&str>) -> bool {
    match hash {
        Some(hash) => verify_password(password, hash),
        None => {
            let _ = verify_password(password, &DUMMY_HASH);
            false
        }
    }
}
