//! Rejection types for auth middleware and extractors.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Authorization rejections produced by extractors and route policies.
#[derive(Debug, thiserror::Error)]
pub enum AuthRejection {
    /// No authenticated context on the request.
    #[error("authentication required")]
    Unauthenticated,

    /// User lacks the required role.
    #[error("insufficient permissions: requires {0} role")]
    InsufficientRole(String),
}

impl AuthRejection {
    /// The HTTP status this rejection maps to.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::InsufficientRole(_) => StatusCode::FORBIDDEN,
        }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}
