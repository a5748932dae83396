//! In-memory publication repository.

use async_trait::async_trait;
use std::sync::Arc;

use super::store::MemoryStore;
use crate::domain::entities::Publication;
use crate::domain::repositories::PublicationRepository;
use crate::error::AppError;

pub struct InMemoryPublicationRepository {
    store: Arc<MemoryStore>,
}

impl InMemoryPublicationRepository {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl PublicationRepository for InMemoryPublicationRepository {
    async fn create(&self, publication: Publication) -> Result<Publication, AppError> {
        let mut tables = self.store.lock()?;
        let id = tables.next_id();
        let publication = publication.with_id(id);
        tables.publications.insert(id, publication.clone());
        Ok(publication)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Publication>, AppError> {
        Ok(self.store.lock()?.publications.get(&id).cloned())
    }

    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<Publication>, AppError> {
        let tables = self.store.lock()?;
        Ok(ids
            .iter()
            .filter_map(|id| tables.publications.get(id).cloned())
            .collect())
    }

    async fn list(&self) -> Result<Vec<Publication>, AppError> {
        Ok(self.store.lock()?.publications.values().cloned().collect())
    }
}
