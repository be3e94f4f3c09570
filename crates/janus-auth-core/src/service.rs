//! Auth service - credential checks and bearer resolution
//!
//! `authenticate` proves an identity from username/password; it never mints
//! tokens. `resolve_bearer` is the inverse direction, turning a presented
//! token back into a store-backed identity for the request gate.

use std::sync::Arc;

use janus_db::{UserRepository, UserRow};

use crate::password::verify_password;
use crate::token::{TokenClaims, TokenCodec};
use crate::AuthError;

/// Auth service erased over its backing repository, as middleware holds it
pub type SharedAuthService = Arc<AuthService<dyn UserRepository>>;

/// Policy knobs applied during authentication
#[derive(Debug, Clone)]
pub struct AuthPolicy {
    /// Reject disabled accounts at login and at bearer resolution. The
    /// rejection is indistinguishable from bad credentials externally.
    pub require_enabled: bool,
}

impl Default for AuthPolicy {
    fn default() -> Self {
        Self {
            require_enabled: true,
        }
    }
}

/// Outcome of resolving a bearer token against the user store
#[derive(Debug, Clone)]
pub struct AuthResolution {
    /// The freshly loaded user row
    pub user: UserRow,
    /// The verified claim set
    pub claims: TokenClaims,
}

/// Authentication service
///
/// Stateless by design: every call re-derives trust from its inputs plus a
/// fresh repository lookup. Nothing is cached between requests.
pub struct AuthService<R: UserRepository + ?Sized> {
    codec: Arc<TokenCodec>,
    policy: AuthPolicy,
    repo: Arc<R>,
}

impl<R: UserRepository + ?Sized> AuthService<R> {
    /// Create a new auth service
    pub fn new(codec: Arc<TokenCodec>, repo: Arc<R>, policy: AuthPolicy) -> Self {
        Self {
            codec,
            policy,
            repo,
        }
    }

    // =========================================================================
    // Login
    // =========================================================================

    /// Verify a username/password pair and return the proven identity.
    ///
    /// Unknown username, wrong password and (when the policy demands it) a
    /// disabled account all fail identically. Token issuance is the
    /// caller's job; see [`TokenCodec::issue`].
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<UserRow, AuthError> {
        let Some(user) = self.repo.find_by_username(username).await? else {
            tracing::debug!("login attempt for unknown username");
            return Err(AuthError::InvalidCredentials);
        };

        if !verify_password(password, &user.password_hash)? {
            tracing::debug!(user_id = %user.id, "login attempt with wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        if self.policy.require_enabled && !user.enabled {
            tracing::debug!(user_id = %user.id, "login attempt for disabled account");
            return Err(AuthError::InvalidCredentials);
        }

        Ok(user)
    }

    // =========================================================================
    // Bearer resolution
    // =========================================================================

    /// Resolve a presented bearer token into a store-backed identity.
    ///
    /// The subject claim is read without trusting it, the user row is
    /// loaded fresh, and only then is the token verified against that
    /// row's username. Every failure collapses to the opaque
    /// [`AuthError::InvalidToken`].
    pub async fn resolve_bearer(&self, token: &str) -> Result<AuthResolution, AuthError> {
        let subject = TokenCodec::peek_subject(token).ok_or(AuthError::InvalidToken)?;

        let Some(user) = self.repo.find_by_username(&subject).await? else {
            tracing::debug!("bearer token subject has no matching user");
            return Err(AuthError::InvalidToken);
        };

        let claims = self.codec.verify(token, &user.username)?;

        if self.policy.require_enabled && !user.enabled {
            tracing::debug!(user_id = %user.id, "bearer token for disabled account");
            return Err(AuthError::InvalidToken);
        }

        Ok(AuthResolution { user, claims })
    }

    /// The codec this service verifies against
    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }
}

impl<R: UserRepository + ?Sized> std::fmt::Debug for AuthService<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("codec", &self.codec)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
