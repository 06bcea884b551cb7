use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

#[cfg(test)]
pub mod memory;
pub mod repo;
mod repo_types;

pub use repo::PgUserStore;
pub use repo_types::User;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("email already registered")]
    DuplicateEmail,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("user store unavailable: {0}")]
    Unavailable(String),
}

/// Access to the `users` table.
///
/// Email uniqueness is the store's responsibility and ignores case: `create`
/// must fail with [`StoreError::DuplicateEmail`] instead of inserting a second
/// row, and `find_by_email` matches any casing of a stored address.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;
    async fn create(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, StoreError>;
    /// Deletes every user.
    async fn truncate(&self) -> Result<(), StoreError>;
}
