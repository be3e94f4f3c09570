//! In-memory user repository
//!
//! DashMap-backed store used by tests and demo deployments running without
//! a database. Uniqueness is enforced through the index maps' entry API, so
//! concurrent duplicate registrations collapse to a single winner exactly as
//! they do under the Postgres unique indexes.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::models::UserRow;
use crate::repo::{CreateUser, UserRepository};

/// In-memory user repository
#[derive(Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<DashMap<Uuid, UserRow>>,
    by_username: Arc<DashMap<String, Uuid>>,
    by_email: Arc<DashMap<String, Uuid>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users
    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Reserve an index slot, failing when the key is already taken.
    fn claim(
        index: &DashMap<String, Uuid>,
        key: String,
        id: Uuid,
        constraint: &str,
    ) -> DbResult<()> {
        match index.entry(key) {
            Entry::Occupied(_) => Err(DbError::UniqueViolation(constraint.to_string())),
            Entry::Vacant(slot) => {
                slot.insert(id);
                Ok(())
            }
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<UserRow>> {
        Ok(self.users.get(&id).map(|r| r.value().clone()))
    }

    async fn find_by_username(&self, username: &str) -> DbResult<Option<UserRow>> {
        Ok(self
            .by_username
            .get(username)
            .and_then(|id| self.users.get(id.value()).map(|r| r.value().clone())))
    }

    async fn find_by_email(&self, email: &str) -> DbResult<Option<UserRow>> {
        Ok(self
            .by_email
            .get(email)
            .and_then(|id| self.users.get(id.value()).map(|r| r.value().clone())))
    }

    async fn exists_by_username(&self, username: &str) -> DbResult<bool> {
        Ok(self.by_username.contains_key(username))
    }

    async fn exists_by_email(&self, email: &str) -> DbResult<bool> {
        Ok(self.by_email.contains_key(email))
    }

    async fn create(&self, user: CreateUser) -> DbResult<UserRow> {
        Self::claim(
            &self.by_username,
            user.username.clone(),
            user.id,
            "users_username_key",
        )?;
        if let Err(err) =
            Self::claim(&self.by_email, user.email.clone(), user.id, "users_email_key")
        {
            // Roll back the username reservation before reporting the conflict
            self.by_username.remove(&user.username);
            return Err(err);
        }

        let now = Utc::now();
        let row = UserRow {
            id: user.id,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            roles: user.roles,
            enabled: user.enabled,
            created_at: now,
            updated_at: now,
        };
        self.users.insert(row.id, row.clone());
        Ok(row)
    }

    async fn find_all(&self) -> DbResult<Vec<UserRow>> {
        let mut rows: Vec<UserRow> = self.users.iter().map(|r| r.value().clone()).collect();
        rows.sort_by_key(|r| r.created_at);
        Ok(rows)
    }

    async fn ping(&self) -> DbResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user(username: &str, email: &str) -> CreateUser {
        CreateUser {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash: "$2b$04$notarealhash".to_string(),
            roles: vec!["user".to_string()],
            enabled: true,
        }
    }

    #[tokio::test]
    async fn create_and_find() {
        let repo = InMemoryUserRepository::new();

        let created = repo
            .create(sample_user("alice", "alice@example.com"))
            .await
            .unwrap();

        let by_id = repo.find_by_id(created.id).await.unwrap();
        assert_eq!(by_id.unwrap().username, "alice");

        let by_username = repo.find_by_username("alice").await.unwrap();
        assert!(by_username.is_some());

        let by_email = repo.find_by_email("alice@example.com").await.unwrap();
        assert!(by_email.is_some());

        assert!(repo.exists_by_username("alice").await.unwrap());
        assert!(repo.exists_by_email("alice@example.com").await.unwrap());
        assert!(!repo.exists_by_username("bob").await.unwrap());
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let repo = InMemoryUserRepository::new();
        repo.create(sample_user("alice", "alice@example.com"))
            .await
            .unwrap();

        let err = repo
            .create(sample_user("alice", "other@example.com"))
            .await
            .unwrap_err();
        assert!(err.violates_unique_on("username"));
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn duplicate_email_rolls_back_username_claim() {
        let repo = InMemoryUserRepository::new();
        repo.create(sample_user("alice", "shared@example.com"))
            .await
            .unwrap();

        let err = repo
            .create(sample_user("bob", "shared@example.com"))
            .await
            .unwrap_err();
        assert!(err.violates_unique_on("email"));

        // "bob" must be claimable again after the failed insert
        repo.create(sample_user("bob", "bob@example.com"))
            .await
            .unwrap();
        assert_eq!(repo.len(), 2);
    }

    #[tokio::test]
    async fn concurrent_duplicates_have_one_winner() {
        let repo = InMemoryUserRepository::new();

        let (a, b) = tokio::join!(
            repo.create(sample_user("carol", "carol@example.com")),
            repo.create(sample_user("carol", "carol2@example.com")),
        );

        assert_eq!(a.is_ok() as u8 + b.is_ok() as u8, 1);
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn find_all_returns_oldest_first() {
        let repo = InMemoryUserRepository::new();
        repo.create(sample_user("a", "a@example.com")).await.unwrap();
        repo.create(sample_user("b", "b@example.com")).await.unwrap();

        let all = repo.find_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert!(all[0].created_at <= all[1].created_at);
    }
}
