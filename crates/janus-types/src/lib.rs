//! Janus Types - Shared domain types
//!
//! This crate contains domain types used across Janus services:
//! - User identity
//! - Roles and authorization vocabulary

pub mod role;
pub mod user;

pub use role::*;
pub use user::*;
