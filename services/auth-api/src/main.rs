//! Janus Auth API
//!
//! Stateless JWT authentication microservice.
//!
//! ## REST Endpoints
//!
//! - `POST /auth/register` - Create an account
//! - `POST /auth/login` - Check credentials, issue a bearer token
//! - `GET /auth/me` - The caller's own account
//! - `GET /hello` - Protected smoke test
//! - `GET /users` - Every account (admin role)
//!
//! ## Health Endpoints
//!
//! - `GET /health` - Liveness probe
//! - `GET /ready` - Readiness probe

use std::sync::Arc;

use tokio::signal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use auth_api::config::Config;
use auth_api::AppState;
use janus_auth_core::{hash_password, SigningKey, TokenCodec};
use janus_db::memory::InMemoryUserRepository;
use janus_db::pg::PgUserRepository;
use janus_db::{CreateUser, UserRepository};
use janus_types::Role;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive("auth_api=debug".parse()?))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Janus Auth API");

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!(
        bind_addr = %config.bind_addr,
        issuer = %config.jwt_issuer,
        "Configuration loaded"
    );

    // Pick the user store
    let users = build_store(&config).await?;

    if config.seed_demo_users {
        seed_demo_users(users.as_ref()).await?;
    }

    // Token codec from the configured secret
    let key = SigningKey::new(&config.jwt_secret)?;
    let codec = TokenCodec::new(key, config.jwt_issuer.clone(), config.token_ttl);

    // Create application state and router
    let state = AppState::new(codec, users, config.clone());
    let app = auth_api::router(state);

    // Start server
    tracing::info!("HTTP server listening on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Postgres when `DATABASE_URL` is set, the in-memory store otherwise
async fn build_store(config: &Config) -> anyhow::Result<Arc<dyn UserRepository>> {
    match &config.database_url {
        Some(url) => {
            let pool = janus_db::create_pool(url).await?;
            janus_db::pg::run_migrations(&pool).await?;
            tracing::info!("Database pool created");
            Ok(Arc::new(PgUserRepository::new(pool)))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using the in-memory user store");
            Ok(Arc::new(InMemoryUserRepository::new()))
        }
    }
}

/// Seed `user/password` and `admin/admin123` for demos
async fn seed_demo_users(users: &dyn UserRepository) -> anyhow::Result<()> {
    tracing::warn!("SEED_DEMO_USERS is set, seeding demo accounts");

    let demo = [
        ("user", "user@janus.local", "password", Role::User),
        ("admin", "admin@janus.local", "admin123", Role::Admin),
    ];

    for (username, email, password, role) in demo {
        if users.exists_by_username(username).await? {
            continue;
        }

        let password_hash = hash_password(password)?;
        users
            .create(CreateUser {
                id: uuid::Uuid::new_v4(),
                username: username.to_string(),
                email: email.to_string(),
                password_hash,
                roles: vec![role.as_str().to_string()],
                enabled: true,
            })
            .await?;

        tracing::info!(username, "Demo account seeded");
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
