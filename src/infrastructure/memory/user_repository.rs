//! In-memory user repository.

use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

use super::store::MemoryStore;
use crate::domain::entities::User;
use crate::domain::repositories::UserRepository;
use crate::error::AppError;

pub struct InMemoryUserRepository {
    store: Arc<MemoryStore>,
}

impl InMemoryUserRepository {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, AppError> {
        let mut tables = self.store.lock()?;
        if tables.users.values().any(|u| u.email() == user.email()) {
            return Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "users_email_key" }),
            ));
        }

        let id = tables.next_id();
        let user = user.with_id(id);
        tables.users.insert(id, user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let tables = self.store.lock()?;
        Ok(tables.users.values().find(|u| u.email() == email).cloned())
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.store.lock()?.users.len() as i64)
    }
}
