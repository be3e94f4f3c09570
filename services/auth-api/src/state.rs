//! Application state

use std::sync::Arc;

use janus_auth_core::{
    AuthPolicy, AuthService, RegistrationService, SharedAuthService, TokenCodec,
};
use janus_db::UserRepository;

use crate::config::Config;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Token codec for issuing login tokens
    pub codec: Arc<TokenCodec>,
    /// Auth service for credential checks and bearer resolution
    pub auth: SharedAuthService,
    /// Registration service for account creation
    pub registration: Arc<RegistrationService<dyn UserRepository>>,
    /// User store (shared reference for reads and health checks)
    pub users: Arc<dyn UserRepository>,
    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Create new application state
    pub fn new(codec: TokenCodec, users: Arc<dyn UserRepository>, config: Config) -> Self {
        let codec = Arc::new(codec);
        let policy = AuthPolicy {
            require_enabled: config.require_enabled,
        };
        let auth: SharedAuthService =
            Arc::new(AuthService::new(codec.clone(), users.clone(), policy));
        let registration = Arc::new(RegistrationService::new(users.clone()));

        Self {
            codec,
            auth,
            registration,
            users,
            config: Arc::new(config),
        }
    }
}
