//! Signing key handling
//!
//! The symmetric key is loaded once at process start and shared immutably.
//! Nothing in this module, including the Debug impl, ever exposes the key
//! bytes.

use jsonwebtoken::{DecodingKey, EncodingKey};
use std::sync::Arc;

/// Pre-validated HMAC-SHA256 signing key.
///
/// Building the jsonwebtoken key material from raw bytes has overhead, so
/// both directions are prepared up front and the struct is cheap to clone.
#[derive(Clone)]
pub struct SigningKey {
    key_bytes: Arc<[u8]>,
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SigningKey {
    /// Minimum allowed key length in bytes (256 bits)
    pub const MIN_KEY_LENGTH: usize = 32;

    /// Create a new signing key from bytes.
    ///
    /// # Errors
    /// Returns an error if the key is shorter than 32 bytes.
    pub fn new(key: impl AsRef<[u8]>) -> Result<Self, SigningKeyError> {
        let key_bytes = key.as_ref();
        if key_bytes.len() < Self::MIN_KEY_LENGTH {
            return Err(SigningKeyError::KeyTooShort {
                actual: key_bytes.len(),
                minimum: Self::MIN_KEY_LENGTH,
            });
        }
        Ok(Self {
            encoding: EncodingKey::from_secret(key_bytes),
            decoding: DecodingKey::from_secret(key_bytes),
            key_bytes: Arc::from(key_bytes),
        })
    }

    /// Key length in bytes
    pub fn len(&self) -> usize {
        self.key_bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.key_bytes.is_empty()
    }

    pub(crate) fn encoding_key(&self) -> &EncodingKey {
        &self.encoding
    }

    pub(crate) fn decoding_key(&self) -> &DecodingKey {
        &self.decoding
    }
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKey")
            .field("key_length", &self.key_bytes.len())
            .finish_non_exhaustive()
    }
}

/// Errors that can occur when creating a signing key
#[derive(Debug, Clone, thiserror::Error)]
pub enum SigningKeyError {
    #[error("signing key too short: got {actual} bytes, need at least {minimum}")]
    KeyTooShort { actual: usize, minimum: usize },
}
