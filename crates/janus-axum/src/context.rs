//! Authentication context types.
//!
//! The [`AuthContext`] struct contains the authenticated user information
//! available to request handlers.

use janus_db::UserRow;
use janus_types::{Role, UserId};

/// Authentication context for the current request.
///
/// Populated by the Janus middleware from the freshly loaded user row, not
/// from token claims, so role changes take effect on the next request.
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// The authenticated user's ID.
    pub user_id: UserId,
    /// The authenticated username (the token subject).
    pub username: String,
    /// The user's roles.
    pub roles: Vec<Role>,
}

impl AuthContext {
    /// Create a new auth context.
    #[must_use]
    pub fn new(user_id: UserId, username: impl Into<String>, roles: Vec<Role>) -> Self {
        Self {
            user_id,
            username: username.into(),
            roles,
        }
    }

    /// Build a context from a stored user row.
    #[must_use]
    pub fn for_user(user: &UserRow) -> Self {
        Self {
            user_id: user.user_id(),
            username: user.username.clone(),
            roles: user.roles(),
        }
    }

    /// Check if the user holds a specific role.
    #[must_use]
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// Check if the user is an admin.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }
}
