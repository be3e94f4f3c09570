//! Configuration for the Auth API service.

use std::net::SocketAddr;

use chrono::Duration;

/// Auth API configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Socket address the HTTP server binds to
    pub bind_addr: SocketAddr,

    /// Database URL; absent means the in-memory store
    pub database_url: Option<String>,

    /// Symmetric token signing secret (minimum 32 bytes)
    pub jwt_secret: String,

    /// Issuer claim stamped into and required from every token
    pub jwt_issuer: String,

    /// Token lifetime
    pub token_ttl: Duration,

    /// Reject disabled accounts at login and bearer resolution
    pub require_enabled: bool,

    /// Seed demo accounts at startup
    pub seed_demo_users: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Signing secret (minimum 32 bytes)
        let jwt_secret =
            std::env::var("JWT_SECRET").map_err(|_| ConfigError::Missing("JWT_SECRET"))?;

        if jwt_secret.len() < 32 {
            return Err(ConfigError::Invalid(
                "JWT_SECRET must be at least 32 bytes",
            ));
        }

        let jwt_issuer =
            std::env::var("JWT_ISSUER").unwrap_or_else(|_| "janus-auth".to_string());

        // Token lifetime (default 1 hour)
        let token_ttl_secs: i64 = std::env::var("TOKEN_TTL_SECS")
            .unwrap_or_else(|_| "3600".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("TOKEN_TTL_SECS"))?;

        if token_ttl_secs < 1 {
            return Err(ConfigError::Invalid("TOKEN_TTL_SECS must be positive"));
        }

        // Server address
        let bind_addr = std::env::var("BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("BIND_ADDR"))?;

        // Database; absence selects the in-memory store
        let database_url = std::env::var("DATABASE_URL").ok();

        let require_enabled = std::env::var("REQUIRE_ENABLED")
            .unwrap_or_else(|_| "true".to_string())
            .parse()
            .unwrap_or(true);

        let seed_demo_users = std::env::var("SEED_DEMO_USERS")
            .unwrap_or_else(|_| "false".to_string())
            .parse()
            .unwrap_or(false);

        Ok(Self {
            bind_addr,
            database_url,
            jwt_secret,
            jwt_issuer,
            token_ttl: Duration::seconds(token_ttl_secs),
            require_enabled,
            seed_demo_users,
        })
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
