use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use super::{StoreError, User, UserStore};

/// In-process stand-in for the users table, used by unit tests.
#[derive(Default)]
pub struct MemoryUserStore {
    rows: Mutex<Vec<User>>,
}

impl MemoryUserStore {
    fn rows(&self) -> Result<MutexGuard<'_, Vec<User>>, StoreError> {
        self.rows
            .lock()
            .map_err(|_| StoreError::Unavailable("user store lock poisoned".into()))
    }

    pub fn all(&self) -> Vec<User> {
        self.rows().map(|rows| rows.to_vec()).unwrap_or_default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .rows()?
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.rows()?.iter().find(|u| u.id == id).cloned())
    }

    async fn create(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, StoreError> {
        let mut rows = self.rows()?;
        if rows.iter().any(|u| u.email.eq_ignore_ascii_case(email)) {
            return Err(StoreError::DuplicateEmail);
        }
        let now = OffsetDateTime::now_utc();
        let user = User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: now,
            updated_at: now,
        };
        rows.push(user.clone());
        Ok(user)
    }

    async fn truncate(&self) -> Result<(), StoreError> {
        self.rows()?.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_rejects_duplicate_email() {
        let store = MemoryUserStore::default();
        store.create("a", "a@example.com", "hash").await.expect("first insert");
        let err = store
            .create("b", "a@example.com", "hash")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail));
        assert_eq!(store.all().len(), 1);
        assert_eq!(store.all()[0].name, "a");
    }

    #[tokio::test]
    async fn email_lookup_and_uniqueness_ignore_case() {
        let store = MemoryUserStore::default();
        store.create("a", "user@test.com", "hash").await.expect("insert");
        let found = store
            .find_by_email("USER@Test.com")
            .await
            .expect("lookup")
            .expect("found");
        assert_eq!(found.email, "user@test.com");
        let err = store.create("b", "User@TEST.com", "hash").await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail));
    }

    #[tokio::test]
    async fn truncate_clears_rows() {
        let store = MemoryUserStore::default();
        store.create("a", "a@example.com", "hash").await.expect("insert");
        store.truncate().await.expect("truncate");
        assert!(store.find_by_email("a@example.com").await.expect("lookup").is_none());
    }
}
