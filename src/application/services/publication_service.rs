//! Publication catalogue service.

use std::sync::Arc;

use tracing::info;

use crate::domain::clock::Clock;
use crate::domain::entities::Publication;
use crate::domain::errors::OrchestrationError;
use crate::domain::repositories::PublicationRepository;
use crate::error::AppError;

/// Service for adding and browsing books and magazines.
pub struct PublicationService {
    repository: Arc<dyn PublicationRepository>,
    clock: Arc<dyn Clock>,
}

impl PublicationService {
    /// Creates a new publication service.
    pub fn new(repository: Arc<dyn PublicationRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// Adds a book to the catalogue.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for invalid title, year, copies,
    /// author or ISBN.
    pub async fn create_book(
        &self,
        title: String,
        author: String,
        isbn: String,
        publication_year: i32,
        available_copies: i32,
    ) -> Result<Publication, AppError> {
        let book = Publication::book(
            title,
            author,
            isbn,
            publication_year,
            available_copies,
            self.clock.as_ref(),
        )?;
        self.store(book).await
    }

    /// Adds a magazine to the catalogue.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for invalid title, year, copies,
    /// editor or ISSN.
    pub async fn create_magazine(
        &self,
        title: String,
        editor: String,
        issn: String,
        publication_year: i32,
        available_copies: i32,
    ) -> Result<Publication, AppError> {
        let magazine = Publication::magazine(
            title,
            editor,
            issn,
            publication_year,
            available_copies,
            self.clock.as_ref(),
        )?;
        self.store(magazine).await
    }

    /// Retrieves a publication by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the publication does not exist.
    pub async fn get_publication(&self, id: i64) -> Result<Publication, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| OrchestrationError::PublicationNotFound(vec![id]).into())
    }

    /// Lists the whole catalogue.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn list_publications(&self) -> Result<Vec<Publication>, AppError> {
        self.repository.list().await
    }

    async fn store(&self, publication: Publication) -> Result<Publication, AppError> {
        let created = self.repository.create(publication).await?;
        info!(
            id = ?created.id(),
            kind = created.kind().tag(),
            title = created.title(),
            "Publication added"
        );
        Ok(created)
    }
}
