//! Argon2 password hashing and verification.

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};

fn salt() -> Result<SaltString, argon2::password_hash::Error> {
    use rand::Rng;
    let mut bytes = [0u8; 16];
    rand::rng().fill(&mut bytes);
    SaltString::encode_b64(&bytes)
}

/// Hash a password with the default (fixed) Argon2 parameters.
pub fn hash(password: &str) -> Result<String, argon2::password_hash::Error> {
    Argon2::default()
        .hash_password(password.as_bytes(), &salt()?)
        .map(|digest| digest.to_string())
}

/// Verify a password against a stored digest. A malformed digest verifies
/// as false, indistinguishable from a mismatch.
pub fn verify(password: &str, digest: &str) -> bool {
    PasswordHash::new(digest)
        .ok()
        .as_ref()
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), parsed)
                .is_ok()
        })
        .unwrap_or(false)
}
