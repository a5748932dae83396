//! Repository trait for publications.

use crate::domain::entities::Publication;
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for books and magazines.
///
/// Copy counts are only changed by [`super::LoanRepository`] as part of
/// registering or returning a loan.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PublicationRepository: Send + Sync {
    /// Stores a validated publication and returns it with its id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn create(&self, publication: Publication) -> Result<Publication, AppError>;

    /// Finds a publication by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn find_by_id(&self, id: i64) -> Result<Option<Publication>, AppError>;

    /// Finds all publications whose id is in `ids`.
    ///
    /// Missing ids are skipped; callers compare lengths to detect them.
    /// Results follow the order of `ids`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<Publication>, AppError>;

    /// Lists all publications ordered by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn list(&self) -> Result<Vec<Publication>, AppError>;
}
