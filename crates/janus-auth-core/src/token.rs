//! JWT issuance and verification
//!
//! Tokens are compact HS256 JWS strings. Verification recomputes validity
//! entirely from the token bytes, the signing key, and the current time;
//! there is no server-side session record to consult.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, Header, Validation};
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use uuid::Uuid;

use janus_types::Role;

use crate::{AuthError, SigningKey};

/// Claims carried by an issued token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (username)
    pub sub: String,
    /// Roles held at issuance. Advisory: authorization re-reads roles from
    /// the user store on every request.
    #[serde(default)]
    pub roles: Vec<Role>,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
    /// Issuer
    pub iss: String,
    /// Unique token id
    pub jti: String,
}

impl TokenClaims {
    /// Check if the token is expired. A token is already invalid at the
    /// exact expiry instant, not one instant later.
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Issues and verifies bearer credentials.
///
/// Pure apart from reading the immutable signing key and drawing entropy
/// for token ids, so a single instance is shared freely across tasks.
#[derive(Clone)]
pub struct TokenCodec {
    key: SigningKey,
    issuer: String,
    lifetime: Duration,
}

impl TokenCodec {
    /// Create a new codec with the given key, issuer and token lifetime
    pub fn new(key: SigningKey, issuer: impl Into<String>, lifetime: Duration) -> Self {
        Self {
            key,
            issuer: issuer.into(),
            lifetime,
        }
    }

    /// Configured issuer identifier
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Configured token lifetime
    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Issue a signed token for the given subject.
    ///
    /// Embeds issued-at, expiry (issued-at plus the configured lifetime),
    /// the configured issuer, a fresh random token id, and the roles.
    pub fn issue(&self, subject: &str, roles: &[Role]) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();
        let claims = TokenClaims {
            sub: subject.to_string(),
            roles: roles.to_vec(),
            iat: now,
            exp: now + self.lifetime.num_seconds(),
            iss: self.issuer.clone(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, self.key.encoding_key()).map_err(|e| {
            tracing::error!("token signing failed: {}", e);
            AuthError::Internal("token signing failed".to_string())
        })
    }

    /// Verify a token and bind it to the expected subject.
    ///
    /// All failure causes (bad signature, malformed structure, wrong
    /// issuer, expired, subject mismatch) collapse into the one opaque
    /// [`AuthError::InvalidToken`]; the cause is debug-logged only. Repeated
    /// verification of the same token yields identical claims.
    pub fn verify(&self, token: &str, expected_subject: &str) -> Result<TokenClaims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.leeway = 0;

        let data =
            decode::<TokenClaims>(token, self.key.decoding_key(), &validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                        tracing::debug!("token expired")
                    }
                    _ => tracing::debug!("token validation failed: {}", e),
                }
                AuthError::InvalidToken
            })?;

        let claims = data.claims;

        // Constant-time comparison; the subject is attacker-controlled.
        let subject_matches: bool = claims
            .sub
            .as_bytes()
            .ct_eq(expected_subject.as_bytes())
            .into();
        if !subject_matches {
            tracing::debug!("token subject mismatch");
            return Err(AuthError::InvalidToken);
        }

        // The library treats exp == now as still valid; the contract here
        // is that a token dies at the expiry instant exactly.
        if claims.is_expired() {
            tracing::debug!("token at or past expiry");
            return Err(AuthError::InvalidToken);
        }

        Ok(claims)
    }

    /// Extract the subject claim without verifying the signature.
    ///
    /// Untrusted by construction: the result picks which user row to
    /// resolve before [`TokenCodec::verify`] runs, and grants nothing by
    /// itself.
    pub fn peek_subject(token: &str) -> Option<String> {
        let payload = token.split('.').nth(1)?;
        let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
        let value: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
        value.get("sub")?.as_str().map(ToOwned::to_owned)
    }
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("issuer", &self.issuer)
            .field("lifetime_secs", &self.lifetime.num_seconds())
            .finish_non_exhaustive()
    }
}
