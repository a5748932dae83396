//! Repository trait for memberships.

use chrono::NaiveDate;

use crate::domain::entities::Membership;
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for user memberships.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MembershipRepository: Send + Sync {
    /// Stores a validated membership and returns it with its id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn create(&self, membership: Membership) -> Result<Membership, AppError>;

    /// Persists the free-loan quota of a stored membership.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the membership does not exist.
    /// Returns [`AppError::Internal`] on storage errors.
    async fn update(&self, membership: &Membership) -> Result<(), AppError>;

    /// Finds the membership of `user_id` whose window contains `date`
    /// (`start_date <= date < end_date`).
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn find_active(
        &self,
        user_id: i64,
        date: NaiveDate,
    ) -> Result<Option<Membership>, AppError>;

    /// Lists every membership of a user, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn find_by_user(&self, user_id: i64) -> Result<Vec<Membership>, AppError>;
}
