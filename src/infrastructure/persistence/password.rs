//! bcrypt password hashing.
//!
//! Hashing is CPU bound, so both operations run on the blocking thread pool
//! and never stall the request executor.

use crate::domain::error::ModelError;

/// bcrypt work factor used for stored passwords.
pub const DEFAULT_COST: u32 = 12;

/// Hashes `password` with the given bcrypt cost.
pub async fn hash_password(password: String, cost: u32) -> Result<String, ModelError> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| ModelError::PasswordHash(e.to_string()))?
        .map_err(|e| ModelError::PasswordHash(e.to_string()))
}

/// Checks `password` against a stored bcrypt hash.
///
/// A mismatch is `Ok(false)`; only a malformed hash or a failed worker is an error.
pub async fn verify_password(password: String, hash: String) -> Result<bool, ModelError> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| ModelError::PasswordHash(e.to_string()))?
        .map_err(|e| ModelError::PasswordHash(e.to_string()))
}
