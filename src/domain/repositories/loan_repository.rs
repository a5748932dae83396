//! Repository trait for loans.

use crate::domain::entities::Loan;
use crate::error::AppError;
use async_trait::async_trait;

/// How the price of a return is settled when it is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnCharge {
    /// Store `price` as is.
    Price(i64),
    /// Redeem one free loan of the membership and store a price of zero. If
    /// the stored quota is already empty, store `fallback_price` instead.
    FreeLoan {
        membership_id: i64,
        fallback_price: i64,
    },
}

/// Outcome of a stored return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettledReturn {
    pub price: i64,
    pub free_loan_redeemed: bool,
}

/// Repository interface for loans.
///
/// Loan persistence owns the stored copy counts: `create` and `mark_returned`
/// apply the copy changes of the transition as relative updates in the same
/// atomic step as the loan row itself, which serializes concurrent loans on
/// the same publication. A free-loan redemption is part of the same step as
/// the return it pays for.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoanRepository: Send + Sync {
    /// Stores a newly opened loan and takes one copy of each publication.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if a stored count would drop below zero;
    /// nothing is written in that case.
    /// Returns [`AppError::Internal`] on storage errors.
    async fn create(&self, loan: Loan) -> Result<Loan, AppError>;

    /// Finds a loan with its publications.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn find_by_id(&self, id: i64) -> Result<Option<Loan>, AppError>;

    /// Lists the loans of a user, newest first.
    ///
    /// # Arguments
    ///
    /// - `only_active` - If true, returns only loans without a return date
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn find_by_user(&self, user_id: i64, only_active: bool) -> Result<Vec<Loan>, AppError>;

    /// Persists the return of a loan, gives back one copy of each publication
    /// and settles `charge`.
    ///
    /// A free loan is taken with a guarded decrement of the stored quota, so
    /// concurrent returns never redeem the same free loan twice.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the stored loan is already returned.
    /// Returns [`AppError::NotFound`] if the loan does not exist.
    /// Returns [`AppError::Internal`] on storage errors.
    async fn mark_returned(
        &self,
        loan: &Loan,
        charge: ReturnCharge,
    ) -> Result<SettledReturn, AppError>;

    /// Deletes every loan of a user and returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn delete_by_user(&self, user_id: i64) -> Result<u64, AppError>;

    /// Counts loans, optionally only the active ones.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn count(&self, only_active: bool) -> Result<i64, AppError>;
}
