//! Protected demo handler

use axum::Json;
use serde::Serialize;

use janus_axum::RequireAuth;

#[derive(Debug, Serialize)]
pub struct HelloResponse {
    pub message: &'static str,
}

/// GET /hello - Smoke test for the bearer gate
pub async fn hello(_auth: RequireAuth) -> Json<HelloResponse> {
    Json(HelloResponse {
        message: "Bonjour, endpoint protégé OK ✅",
    })
}
