//! Axum extractors for authentication and authorization.
//!
//! These extractors read the context placed on the request by the Janus
//! middleware, so they only work on routers wrapped in [`JanusLayer`].
//!
//! # Usage
//!
//! ```ignore
//! use janus_axum::{MaybeAuth, RequireAdmin, RequireAuth};
//!
//! // Requires authentication (401 if not authenticated)
//! async fn protected(auth: RequireAuth) -> String {
//!     format!("Hello, {}!", auth.username)
//! }
//!
//! // Optional authentication
//! async fn maybe(auth: MaybeAuth) -> String {
//!     match auth.0 {
//!         Some(ctx) => format!("Hello, {}!", ctx.username),
//!         None => "Hello, guest!".to_string(),
//!     }
//! }
//! ```
//!
//! [`JanusLayer`]: crate::layer::JanusLayer

use std::ops::Deref;

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::context::AuthContext;
use crate::error::AuthRejection;

/// Extension key for storing auth context in request extensions.
#[derive(Debug, Clone)]
pub struct AuthContextExt(pub AuthContext);

/// Extractor that requires authentication.
///
/// Returns 401 Unauthorized if no valid authentication is present.
#[derive(Debug, Clone)]
pub struct RequireAuth(pub AuthContext);

impl Deref for RequireAuth {
    type Target = AuthContext;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContextExt>()
            .cloned()
            .map(|ext| Self(ext.0))
            .ok_or(AuthRejection::Unauthenticated)
    }
}

/// Extractor for optional authentication.
///
/// Returns `None` if no authentication is present, rather than failing.
#[derive(Debug, Clone)]
pub struct MaybeAuth(pub Option<AuthContext>);

impl Deref for MaybeAuth {
    type Target = Option<AuthContext>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for MaybeAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth = parts
            .extensions
            .get::<AuthContextExt>()
            .cloned()
            .map(|ext| ext.0);
        Ok(Self(auth))
    }
}

/// Extractor that requires the admin role.
///
/// Returns 403 Forbidden if the user is not an admin.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub AuthContext);

impl Deref for RequireAdmin {
    type Target = AuthContext;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth = parts
            .extensions
            .get::<AuthContextExt>()
            .cloned()
            .map(|ext| ext.0)
            .ok_or(AuthRejection::Unauthenticated)?;

        if auth.is_admin() {
            Ok(Self(auth))
        } else {
            Err(AuthRejection::InsufficientRole("admin".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use janus_types::{Role, UserId};

    fn parts_with_context(ctx: Option<AuthContext>) -> Parts {
        let mut request = Request::builder().uri("/").body(()).unwrap();
        if let Some(ctx) = ctx {
            request.extensions_mut().insert(AuthContextExt(ctx));
        }
        request.into_parts().0
    }

    fn user_context(roles: Vec<Role>) -> AuthContext {
        AuthContext::new(UserId::new(), "alice", roles)
    }

    #[tokio::test]
    async fn test_require_auth_present() {
        let mut parts = parts_with_context(Some(user_context(vec![Role::User])));
        let auth = RequireAuth::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(auth.username, "alice");
    }

    #[tokio::test]
    async fn test_require_auth_missing() {
        let mut parts = parts_with_context(None);
        let result = RequireAuth::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AuthRejection::Unauthenticated)));
    }

    #[tokio::test]
    async fn test_maybe_auth_is_infallible() {
        let mut parts = parts_with_context(None);
        let auth = MaybeAuth::from_request_parts(&mut parts, &()).await.unwrap();
        assert!(auth.is_none());
    }

    #[tokio::test]
    async fn test_require_admin_rejects_plain_user() {
        let mut parts = parts_with_context(Some(user_context(vec![Role::User])));
        let result = RequireAdmin::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AuthRejection::InsufficientRole(_))));
    }

    #[tokio::test]
    async fn test_require_admin_accepts_admin() {
        let mut parts = parts_with_context(Some(user_context(vec![Role::User, Role::Admin])));
        let auth = RequireAdmin::from_request_parts(&mut parts, &()).await.unwrap();
        assert!(auth.is_admin());
    }
}
