//! Registration - uniqueness invariants and account creation

use std::sync::Arc;

use janus_db::{CreateUser, UserRepository, UserRow};
use janus_types::Role;
use uuid::Uuid;

use crate::password::hash_password;
use crate::AuthError;

/// Input for creating an account
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    /// Requested roles; empty means the base role
    pub roles: Vec<Role>,
}

/// Registration service
pub struct RegistrationService<R: UserRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: UserRepository + ?Sized> RegistrationService<R> {
    /// Create a new registration service
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Register a new account.
    ///
    /// The existence checks are a fast path; two concurrent registrations
    /// for the same name can both pass them. The store's unique constraints
    /// are the real arbiter, and a violation there is reported as the same
    /// conflict the check would have produced.
    pub async fn register(&self, new_user: NewUser) -> Result<UserRow, AuthError> {
        if self.repo.exists_by_username(&new_user.username).await? {
            return Err(AuthError::UsernameTaken(new_user.username));
        }

        if self.repo.exists_by_email(&new_user.email).await? {
            return Err(AuthError::EmailTaken(new_user.email));
        }

        let password_hash = hash_password(&new_user.password)?;

        let roles = if new_user.roles.is_empty() {
            vec![Role::base()]
        } else {
            new_user.roles
        };

        let username = new_user.username;
        let email = new_user.email;
        let create = CreateUser {
            id: Uuid::new_v4(),
            username: username.clone(),
            email: email.clone(),
            password_hash,
            roles: roles.iter().map(Role::to_string).collect(),
            enabled: true,
        };

        match self.repo.create(create).await {
            Ok(row) => {
                tracing::info!(user_id = %row.id, "registered new user");
                Ok(row)
            }
            Err(err) if err.violates_unique_on("username") => {
                tracing::debug!("registration lost username race");
                Err(AuthError::UsernameTaken(username))
            }
            Err(err) if err.violates_unique_on("email") => {
                tracing::debug!("registration lost email race");
                Err(AuthError::EmailTaken(email))
            }
            Err(err) => Err(err.into()),
        }
    }
}

impl<R: UserRepository + ?Sized> std::fmt::Debug for RegistrationService<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrationService").finish_non_exhaustive()
    }
}
