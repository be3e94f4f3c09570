//! Janus Auth Core - Authentication business logic
//!
//! Token issuance and verification, credential checks against the user
//! store, and registration invariants. No HTTP concerns live here; the
//! axum integration is in `janus-axum`.

pub mod error;
pub mod key;
pub mod password;
pub mod registration;
pub mod service;
pub mod token;

pub use error::*;
pub use key::*;
pub use password::{hash_password, verify_password};
pub use registration::*;
pub use service::*;
pub use token::*;
