//! Admin user listing

use axum::extract::State;
use axum::Json;

use janus_axum::RequireAdmin;

use super::auth::UserResponse;
use crate::error::ApiResult;
use crate::state::AppState;

/// GET /users - Every account in the store, admin only
pub async fn list_users(
    State(state): State<AppState>,
    _admin: RequireAdmin,
) -> ApiResult<Json<Vec<UserResponse>>> {
    let users = state.users.find_all().await?;
    Ok(Json(users.iter().map(UserResponse::from).collect()))
}
