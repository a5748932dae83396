//! In-memory membership repository.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::json;
use std::sync::Arc;

use super::store::MemoryStore;
use crate::domain::entities::Membership;
use crate::domain::repositories::MembershipRepository;
use crate::error::AppError;

pub struct InMemoryMembershipRepository {
    store: Arc<MemoryStore>,
}

impl InMemoryMembershipRepository {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl MembershipRepository for InMemoryMembershipRepository {
    async fn create(&self, membership: Membership) -> Result<Membership, AppError> {
        let mut tables = self.store.lock()?;
        let id = tables.next_id();
        let membership = membership.with_id(id);
        tables.memberships.insert(id, membership.clone());
        Ok(membership)
    }

    async fn update(&self, membership: &Membership) -> Result<(), AppError> {
        let mut tables = self.store.lock()?;
        let stored = membership
            .id()
            .and_then(|id| tables.memberships.get_mut(&id))
            .ok_or_else(|| {
                AppError::not_found(
                    "Membership not found",
                    json!({ "id": membership.id() }),
                )
            })?;
        *stored = membership.clone();
        Ok(())
    }

    async fn find_active(
        &self,
        user_id: i64,
        date: NaiveDate,
    ) -> Result<Option<Membership>, AppError> {
        let tables = self.store.lock()?;
        Ok(tables
            .memberships
            .values()
            .filter(|m| m.user_id() == user_id && m.start_date() <= date && m.is_active(date))
            .max_by_key(|m| m.start_date())
            .cloned())
    }

    async fn find_by_user(&self, user_id: i64) -> Result<Vec<Membership>, AppError> {
        let tables = self.store.lock()?;
        let mut memberships: Vec<Membership> = tables
            .memberships
            .values()
            .filter(|m| m.user_id() == user_id)
            .cloned()
            .collect();
        memberships.sort_by_key(|m| m.start_date());
        Ok(memberships)
    }
}
