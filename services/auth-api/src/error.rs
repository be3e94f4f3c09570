//! Error types and the error envelope for the Auth API service.
//!
//! Handlers return [`ApiError`]; the [`error_envelope`] middleware shapes
//! every non-2xx response into one uniform JSON body, whatever produced it.

use std::collections::BTreeMap;

use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use janus_auth_core::AuthError;

/// API error type
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("validation failed")]
    Validation(BTreeMap<String, String>),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("authentication required")]
    Unauthenticated,

    #[error("resource not found")]
    NotFound,
}

impl ApiError {
    /// Flatten field-level validation failures into a field → message map
    pub fn from_validation(errors: &validator::ValidationErrors) -> Self {
        let mut fields = BTreeMap::new();
        for (field, field_errors) in errors.field_errors() {
            let message = field_errors
                .iter()
                .find_map(|error| error.message.as_ref().map(|m| m.to_string()))
                .unwrap_or_else(|| format!("{} is invalid", field));
            fields.insert(field.to_string(), message);
        }
        Self::Validation(fields)
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Auth(err) => StatusCode::from_u16(err.status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::NotFound => StatusCode::NOT_FOUND,
        }
    }

    /// Message safe to put on the wire; server-side faults stay generic
    fn public_message(&self) -> String {
        if self.status().is_server_error() {
            "Internal server error".to_string()
        } else {
            self.to_string()
        }
    }
}

impl From<janus_db::DbError> for ApiError {
    fn from(err: janus_db::DbError) -> Self {
        Self::Auth(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let message = self.public_message();
        let validation_errors = match self {
            Self::Validation(fields) => Some(fields),
            _ => None,
        };

        // The envelope middleware fills in path and timestamp
        let mut response = status.into_response();
        response.extensions_mut().insert(ErrorParts {
            message,
            validation_errors,
        });
        response
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// Pieces of an error response, handed to the envelope via extensions
#[derive(Debug, Clone)]
pub struct ErrorParts {
    pub message: String,
    pub validation_errors: Option<BTreeMap<String, String>>,
}

/// Uniform error body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub timestamp: String,
    pub status: u16,
    pub error: String,
    pub message: String,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_errors: Option<BTreeMap<String, String>>,
}

/// Reshape every error response into the uniform JSON body.
///
/// [`ApiError`] carries its parts in a response extension; anything else
/// (policy rejections, extractor rejections) arrives as plain text and is
/// folded into the `message` field.
pub async fn error_envelope(req: Request, next: Next) -> Response {
    let path = req.uri().path().to_string();
    let mut response = next.run(req).await;

    let status = response.status();
    if !status.is_client_error() && !status.is_server_error() {
        return response;
    }

    let parts = response.extensions_mut().remove::<ErrorParts>();
    let (message, validation_errors) = match parts {
        Some(parts) => (parts.message, parts.validation_errors),
        None => {
            let text = match axum::body::to_bytes(response.into_body(), usize::MAX).await {
                Ok(bytes) => String::from_utf8_lossy(&bytes).trim().to_string(),
                Err(_) => String::new(),
            };
            let message = if text.is_empty() {
                canonical_reason(status)
            } else {
                text
            };
            (message, None)
        }
    };

    let body = ErrorBody {
        timestamp: Utc::now().to_rfc3339(),
        status: status.as_u16(),
        error: canonical_reason(status),
        message,
        path,
        validation_errors,
    };

    (status, Json(body)).into_response()
}

fn canonical_reason(status: StatusCode) -> String {
    status.canonical_reason().unwrap_or("Error").to_string()
}
