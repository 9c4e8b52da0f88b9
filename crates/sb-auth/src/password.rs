//! Argon2id password hashing with a random 16-byte salt per hash.
use super::*;
use argon2::Argon2;
use argon2::PasswordHash;
use argon2::PasswordHasher;
use argon2::PasswordVerifier;
use argon2::password_hash::SaltString;

fn salt() -> Result<SaltString, AuthError> {
    use rand::Rng;
    let ref mut bytes = [0u8; 16];
    rand::rng().fill(bytes);
    SaltString::encode_b64(bytes).map_err(AuthError::Hashing)
}

/// PHC-formatted hash suitable for storage.
pub fn hash(password: &str) -> Result<String, AuthError> {
    Argon2::default()
        .hash_password(password.as_bytes(), &salt()?)
        .map(|h| h.to_string())
        .map_err(AuthError::Hashing)
}

/// Constant-time comparison against a stored hash. Unparseable hashes
/// never verify.
pub fn verify(password: &str, hashword: &str) -> bool {
    PasswordHash::new(hashword)
        .map(|hash| {
            Argon2::default()
                .verify_password(password.as_bytes(), &hash)
                .is_ok()
        })
        .unwrap_or(false)
}

/// Hash of a random secret nobody knows, for spending the same work on
/// unknown accounts as on real ones.
pub fn decoy() -> &'static str {
    static DECOY: std::sync::LazyLock<String> = std::sync::LazyLock::new(|| {
        salt()
            .and_then(|secret| hash(secret.as_str()))
            .inspect_err(|e| log::error!("decoy hash unavailable: {}", e))
            .unwrap_or_default()
    });
    DECOY.as_str()
}
