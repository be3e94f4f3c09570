//! Janus Axum Integration
//!
//! Axum middleware and extractors for integrating with the Janus auth
//! service.
//!
//! # Overview
//!
//! This crate provides the Axum-specific half of Janus:
//! - **Extractors**: `RequireAuth`, `MaybeAuth`, `RequireAdmin`
//! - **Middleware**: `JanusLayer` for bearer token resolution
//! - **Route policies**: `RequireAuthLayer` for strict per-route gating
//!
//! The middleware splits the request gate in two. [`JanusLayer`] wraps the
//! whole router and resolves the bearer token into an [`AuthContext`]
//! without ever rejecting a request. [`RequireAuthLayer`] wraps the routes
//! that need authentication and turns a missing context into a rejection.
//!
//! # Quick Start
//!
//! ```ignore
//! use janus_axum::{JanusLayer, RequireAuth, RequireAuthLayer};
//! use axum::{Router, routing::get};
//!
//! async fn protected_handler(auth: RequireAuth) -> String {
//!     format!("Hello, {}!", auth.username)
//! }
//!
//! let app = Router::new()
//!     .route("/api/protected", get(protected_handler))
//!     .route_layer(RequireAuthLayer::new())
//!     .layer(JanusLayer::new(auth_service));
//! ```
//!
//! # Extractors
//!
//! - [`RequireAuth`] - Requires valid authentication (401 if missing)
//! - [`MaybeAuth`] - Optional authentication (None if missing)
//! - [`RequireAdmin`] - Requires admin role (403 if not admin)

pub mod context;
pub mod error;
pub mod extractors;
pub mod layer;
pub mod policy;

// Re-export primary types
pub use context::AuthContext;
pub use error::AuthRejection;
pub use extractors::{AuthContextExt, MaybeAuth, RequireAdmin, RequireAuth};
pub use layer::{JanusLayer, JanusService};
pub use policy::{RequireAuthLayer, RequireAuthService};
