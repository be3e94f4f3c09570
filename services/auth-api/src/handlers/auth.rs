//! Authentication handlers (register, login, me)

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use janus_auth_core::{AuthError, NewUser};
use janus_axum::RequireAuth;
use janus_db::UserRow;
use janus_types::Role;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 50, message = "username must be 3 to 50 characters"))]
    pub username: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: String,
    /// Requested roles; empty means the base role
    #[serde(default)]
    pub roles: Vec<Role>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(rename = "type")]
    pub token_type: String,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub roles: Vec<Role>,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&UserRow> for UserResponse {
    fn from(user: &UserRow) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            roles: user.roles(),
            enabled: user.enabled,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /auth/register
///
/// Create an account; a duplicate username or email is a 409
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    req.validate().map_err(|e| ApiError::from_validation(&e))?;

    let user = state
        .registration
        .register(NewUser {
            username: req.username,
            email: req.email,
            password: req.password,
            roles: req.roles,
        })
        .await?;

    tracing::info!(username = %user.username, "Account registered");
    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

/// POST /auth/login
///
/// Check credentials and issue a bearer token
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let user = state.auth.authenticate(&req.username, &req.password).await?;
    let token = state.codec.issue(&user.username, &user.roles())?;

    tracing::info!(username = %user.username, "Login succeeded");
    Ok(Json(LoginResponse {
        token,
        token_type: "Bearer".to_string(),
        username: user.username,
        email: user.email,
    }))
}

/// GET /auth/me
///
/// The caller's own account, read fresh from the store
pub async fn me(State(state): State<AppState>, auth: RequireAuth) -> ApiResult<Json<UserResponse>> {
    let user = state
        .users
        .find_by_id(auth.user_id.0)
        .await?
        .ok_or(AuthError::UserNotFound)?;

    Ok(Json(UserResponse::from(&user)))
}
