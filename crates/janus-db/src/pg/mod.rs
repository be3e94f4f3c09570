//! PostgreSQL repository implementations

mod user;

pub use user::PgUserRepository;

use crate::error::DbResult;
use crate::DbPool;

/// Create the users table and its unique indexes if they do not exist.
///
/// The unique indexes are load-bearing: the registration flow's
/// check-then-insert sequence is not atomic, and concurrent duplicates are
/// rejected here rather than in application code.
pub async fn run_migrations(pool: &DbPool) -> DbResult<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id UUID PRIMARY KEY,
            username TEXT NOT NULL,
            email TEXT NOT NULL,
            password_hash TEXT NOT NULL,
            roles TEXT[] NOT NULL DEFAULT ARRAY['user'],
            enabled BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE UNIQUE INDEX IF NOT EXISTS users_username_key ON users (username)")
        .execute(pool)
        .await?;

    sqlx::query("CREATE UNIQUE INDEX IF NOT EXISTS users_email_key ON users (email)")
        .execute(pool)
        .await?;

    tracing::debug!("user store migrations applied");
    Ok(())
}
