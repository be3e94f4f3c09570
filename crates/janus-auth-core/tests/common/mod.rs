//! Shared test fixtures

use chrono::Duration;
use std::sync::Arc;
use uuid::Uuid;

use janus_auth_core::{SigningKey, TokenCodec};
use janus_db::{CreateUser, InMemoryUserRepository, UserRepository, UserRow};

pub const TEST_SECRET: &str = "0123456789abcdef0123456789abcdef";

// Low bcrypt cost keeps the suite fast; the cost travels inside the hash.
pub const TEST_BCRYPT_COST: u32 = 4;

pub fn test_codec() -> Arc<TokenCodec> {
    let key = SigningKey::new(TEST_SECRET).unwrap();
    Arc::new(TokenCodec::new(key, "janus-test", Duration::seconds(3600)))
}

#[allow(dead_code)]
pub fn short_lived_codec(secs: i64) -> Arc<TokenCodec> {
    let key = SigningKey::new(TEST_SECRET).unwrap();
    Arc::new(TokenCodec::new(key, "janus-test", Duration::seconds(secs)))
}

/// Insert a user directly, bypassing the registration flow
#[allow(dead_code)]
pub async fn seed_user(
    repo: &InMemoryUserRepository,
    username: &str,
    email: &str,
    password: &str,
    roles: &[&str],
    enabled: bool,
) -> UserRow {
    let password_hash = bcrypt::hash(password, TEST_BCRYPT_COST).unwrap();
    repo.create(CreateUser {
        id: Uuid::new_v4(),
        username: username.to_string(),
        email: email.to_string(),
        password_hash,
        roles: roles.iter().map(|r| r.to_string()).collect(),
        enabled,
    })
    .await
    .unwrap()
}
