//! Auth API service library.
//!
//! HTTP surface:
//! - `POST /auth/register` - create an account
//! - `POST /auth/login` - check credentials, issue a bearer token
//! - `GET /auth/me` - the caller's own account (bearer)
//! - `GET /hello` - protected smoke test (bearer)
//! - `GET /users` - every account (bearer, admin role)
//! - `GET /health`, `GET /ready` - probes
//!
//! The router wires the two middleware stages from `janus-axum`: the
//! permissive resolution layer runs on every request, strict policy layers
//! sit on the gated route groups only.

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use janus_axum::{JanusLayer, RequireAuthLayer};

pub mod config;
pub mod error;
pub mod handlers;
pub mod state;

pub use state::AppState;

/// Build the service router
pub fn router(state: AppState) -> Router {
    // Public routes (no bearer required)
    let public = Router::new()
        .route("/auth/register", post(handlers::register))
        .route("/auth/login", post(handlers::login));

    // Bearer-gated routes
    let protected = Router::new()
        .route("/hello", get(handlers::hello))
        .route("/auth/me", get(handlers::me))
        .route_layer(RequireAuthLayer::new());

    // Admin-gated routes
    let admin = Router::new()
        .route("/users", get(handlers::list_users))
        .route_layer(RequireAuthLayer::admin());

    // Probes (public; bearer resolution still runs, no policy)
    let health = Router::new()
        .route("/health", get(handlers::health))
        .route("/ready", get(handlers::ready));

    // Build middleware stack (order matters - outermost first)
    let middleware = ServiceBuilder::new()
        // Tracing with request details
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // CORS
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        // Uniform error bodies
        .layer(middleware::from_fn(error::error_envelope))
        // Bearer resolution (innermost - attaches the auth context before routing)
        .layer(JanusLayer::new(state.auth.clone()));

    // Combine all routes
    Router::new()
        .merge(public)
        .merge(protected)
        .merge(admin)
        .merge(health)
        .fallback(handlers::fallback)
        .layer(middleware)
        .with_state(state)
}
