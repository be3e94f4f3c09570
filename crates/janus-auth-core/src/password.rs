//! Password hashing
//!
//! bcrypt wrappers. The cost factor is embedded in the produced hash, so
//! verification works regardless of the cost a hash was created with.

use bcrypt::DEFAULT_COST;

use crate::AuthError;

/// Hash a password for storage
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    bcrypt::hash(password, DEFAULT_COST).map_err(|e| {
        tracing::error!("password hashing failed: {}", e);
        AuthError::Internal("password hashing failed".to_string())
    })
}

/// Verify a password against a stored hash
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, AuthError> {
    bcrypt::verify(password, password_hash).map_err(|e| {
        // A hash that bcrypt cannot parse means corrupt stored data, not a
        // wrong password.
        tracing::error!("password verification failed: {}", e);
        AuthError::Internal("password verification failed".to_string())
    })
}
