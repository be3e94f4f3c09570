//! Repository traits
//!
//! Define async repository interfaces for user store operations. Uniqueness
//! of username and email is enforced by the backing store, not by callers;
//! the existence checks here are advisory fast paths.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::DbResult;
use crate::models::UserRow;

/// User repository trait
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by ID
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<UserRow>>;

    /// Find a user by username
    async fn find_by_username(&self, username: &str) -> DbResult<Option<UserRow>>;

    /// Find a user by email
    async fn find_by_email(&self, email: &str) -> DbResult<Option<UserRow>>;

    /// Check whether a username is taken
    async fn exists_by_username(&self, username: &str) -> DbResult<bool>;

    /// Check whether an email is taken
    async fn exists_by_email(&self, email: &str) -> DbResult<bool>;

    /// Create a new user
    async fn create(&self, user: CreateUser) -> DbResult<UserRow>;

    /// List all users, oldest first
    async fn find_all(&self) -> DbResult<Vec<UserRow>>;

    /// Probe store connectivity (readiness checks)
    async fn ping(&self) -> DbResult<()>;
}

/// Create user input
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub roles: Vec<String>,
    pub enabled: bool,
}
