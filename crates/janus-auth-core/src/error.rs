//! Auth errors

use thiserror::Error;

/// Authentication errors
#[derive(Error, Debug)]
pub enum AuthError {
    /// Invalid token (malformed, bad signature, wrong issuer, expired,
    /// subject mismatch). Deliberately a single variant: callers must not
    /// be able to tell which check failed.
    #[error("invalid token")]
    InvalidToken,

    /// Invalid credentials (unknown username, wrong password)
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Username already registered
    #[error("Username is already taken: {0}")]
    UsernameTaken(String),

    /// Email already registered
    #[error("Email is already in use: {0}")]
    EmailTaken(String),

    /// User not found
    #[error("user not found")]
    UserNotFound,

    /// Authenticated but lacking a required role
    #[error("forbidden")]
    Forbidden,

    /// Database error
    #[error("database error: {0}")]
    Database(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidToken | Self::InvalidCredentials => 401,
            Self::UsernameTaken(_) | Self::EmailTaken(_) => 409,
            Self::UserNotFound => 404,
            Self::Forbidden => 403,
            Self::Database(_) | Self::Configuration(_) | Self::Internal(_) => 500,
        }
    }

    /// Get error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidToken => "INVALID_TOKEN",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::UsernameTaken(_) => "USERNAME_TAKEN",
            Self::EmailTaken(_) => "EMAIL_TAKEN",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::Forbidden => "FORBIDDEN",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<janus_db::DbError> for AuthError {
    fn from(err: janus_db::DbError) -> Self {
        tracing::error!("Database error: {}", err);
        Self::Database(err.to_string())
    }
}
