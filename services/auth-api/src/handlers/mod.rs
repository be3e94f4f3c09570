//! HTTP handlers

use janus_axum::MaybeAuth;

use crate::error::ApiError;

mod auth;
mod health;
mod hello;
mod users;

pub use auth::{login, me, register};
pub use health::{health, ready};
pub use hello::hello;
pub use users::list_users;

/// Fallback for unknown paths.
///
/// Anonymous callers get the same 401 as any protected route; only
/// authenticated callers learn that a path does not exist.
pub async fn fallback(MaybeAuth(auth): MaybeAuth) -> ApiError {
    if auth.is_some() {
        ApiError::NotFound
    } else {
        ApiError::Unauthenticated
    }
}
