//! Janus DB - User store abstractions
//!
//! SQLx-based persistence layer for the Janus auth service, plus an
//! in-memory backing for tests and demo deployments.
//!
//! # Example
//!
//! ```rust,ignore
//! use janus_db::{create_pool, pg::PgUserRepository, UserRepository};
//!
//! let pool = create_pool("postgres://localhost/janus").await?;
//! let users = PgUserRepository::new(pool);
//! let row = users.find_by_username("alice").await?;
//! ```

pub mod error;
pub mod memory;
pub mod models;
pub mod pg;
pub mod pool;
pub mod repo;

pub use error::{DbError, DbResult};
pub use memory::InMemoryUserRepository;
pub use models::*;
pub use pg::PgUserRepository;
pub use pool::{create_pool, create_pool_with_options, DbPool};
pub use repo::*;
