//! Database errors

use thiserror::Error;

/// Result alias for repository operations
pub type DbResult<T> = Result<T, DbError>;

/// Database errors
#[derive(Error, Debug)]
pub enum DbError {
    /// SQLx error
    #[error("database error: {0}")]
    Sqlx(sqlx::Error),

    /// A unique constraint rejected a write; carries the constraint name
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),

    /// Record not found
    #[error("record not found")]
    NotFound,
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        // Postgres class 23505: concurrent duplicate inserts surface here,
        // not in the application-level existence checks.
        if let sqlx::Error::Database(ref db) = err {
            if db.code().as_deref() == Some("23505") {
                let constraint = db.constraint().unwrap_or("unknown").to_string();
                return Self::UniqueViolation(constraint);
            }
        }
        Self::Sqlx(err)
    }
}

impl DbError {
    /// True when the error is a unique violation on the named column
    pub fn violates_unique_on(&self, column: &str) -> bool {
        matches!(self, Self::UniqueViolation(c) if c.contains(column))
    }
}
