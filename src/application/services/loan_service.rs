//! Loan registration, return and cleanup service.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::domain::clock::Clock;
use crate::domain::entities::{Loan, User};
use crate::domain::errors::{OrchestrationError, ValidationError};
use crate::domain::pricing::PricingEngine;
use crate::domain::repositories::{
    LoanRepository, MembershipRepository, PublicationRepository, ReturnCharge, SettledReturn,
    UserRepository,
};
use crate::error::AppError;

/// Amounts due when a loan is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnReceipt {
    pub loan_id: i64,
    pub price: i64,
    pub fine: i64,
    pub late_days: i64,
    pub free_loan_redeemed: bool,
}

impl ReturnReceipt {
    pub fn total(&self) -> i64 {
        self.price + self.fine
    }
}

/// Service coordinating users, publications, memberships and loans.
///
/// Entity rules run in memory first; only a fully validated transition is
/// handed to the repositories, so a rejected call never writes anything.
pub struct LoanService {
    users: Arc<dyn UserRepository>,
    publications: Arc<dyn PublicationRepository>,
    memberships: Arc<dyn MembershipRepository>,
    loans: Arc<dyn LoanRepository>,
    clock: Arc<dyn Clock>,
    pricing: PricingEngine,
}

impl LoanService {
    /// Creates a new loan service.
    pub fn new(
        users: Arc<dyn UserRepository>,
        publications: Arc<dyn PublicationRepository>,
        memberships: Arc<dyn MembershipRepository>,
        loans: Arc<dyn LoanRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            publications,
            memberships,
            loans,
            clock,
            pricing: PricingEngine,
        }
    }

    /// Registers a loan of `publication_ids` for the user with `email`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the user or any publication is missing.
    /// Returns [`AppError::Validation`] for loan rule violations (duplicate or
    /// empty publication list, future start date, no available copies).
    /// Returns [`AppError::Conflict`] if a concurrent loan took the last copy.
    pub async fn register_loan(
        &self,
        email: &str,
        start_date: NaiveDate,
        publication_ids: Vec<i64>,
    ) -> Result<Loan, AppError> {
        let user = self.find_user(email).await?;

        let mut seen = HashSet::new();
        if let Some(dup) = publication_ids.iter().find(|id| !seen.insert(**id)) {
            return Err(ValidationError::InvalidPublications(format!(
                "publication {dup} is listed more than once"
            ))
            .into());
        }

        let publications = self.publications.find_by_ids(&publication_ids).await?;
        if publications.len() != publication_ids.len() {
            let found: HashSet<i64> = publications.iter().filter_map(|p| p.id()).collect();
            let missing: Vec<i64> = publication_ids
                .iter()
                .copied()
                .filter(|id| !found.contains(id))
                .collect();
            warn!(email, ?missing, "Loan refers to unknown publications");
            return Err(OrchestrationError::PublicationNotFound(missing).into());
        }

        let loan = Loan::open(&user, publications, start_date, self.clock.as_ref())?;
        let loan = self.loans.create(loan).await?;

        info!(
            loan_id = ?loan.id(),
            email,
            publications = ?loan.publication_ids(),
            end_date = %loan.end_date(),
            "Loan registered"
        );

        Ok(loan)
    }

    /// Returns a loan on `return_date` and computes price and fine.
    ///
    /// An active membership of the borrower on `return_date` either funds the
    /// return with a free loan or discounts the price by its tier.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the loan does not exist.
    /// Returns [`AppError::Validation`] if the loan is already returned or the
    /// date is before the start date or in the future.
    pub async fn return_loan(
        &self,
        loan_id: i64,
        return_date: NaiveDate,
    ) -> Result<ReturnReceipt, AppError> {
        let mut loan = self.get_loan(loan_id).await?;

        loan.set_return_date(return_date, self.clock.as_ref())?;

        let membership = self
            .memberships
            .find_active(loan.user_id(), return_date)
            .await?;

        let tier_price = self.pricing.calculate_tier_price(&loan, membership.as_ref())?;
        let charge = match membership.as_ref().filter(|m| m.has_free_loan()) {
            Some(m) => ReturnCharge::FreeLoan {
                membership_id: m.id().ok_or_else(|| {
                    AppError::internal("Membership record has no id", json!({ "loan_id": loan_id }))
                })?,
                fallback_price: tier_price,
            },
            None => ReturnCharge::Price(tier_price),
        };
        let fine = self.pricing.calculate_fine(&loan)?;

        let SettledReturn {
            price,
            free_loan_redeemed,
        } = self.loans.mark_returned(&loan, charge).await?;
        if matches!(charge, ReturnCharge::FreeLoan { .. }) && !free_loan_redeemed {
            warn!(loan_id, "Free loan taken by a concurrent return, charged tier price");
        }

        info!(loan_id, price, fine, free_loan_redeemed, "Loan returned");

        Ok(ReturnReceipt {
            loan_id,
            price,
            fine,
            late_days: loan.late_days().unwrap_or(0),
            free_loan_redeemed,
        })
    }

    /// Deletes every loan of a user once all of them are returned.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the user does not exist.
    /// Returns [`AppError::Conflict`] if the user has no loans or still has an
    /// active one.
    pub async fn delete_loans_by_user(&self, email: &str) -> Result<u64, AppError> {
        let user = self.find_user(email).await?;
        let user_id = stored_id(&user)?;

        let loans = self.loans.find_by_user(user_id, false).await?;
        if loans.is_empty() {
            return Err(OrchestrationError::UserHasNoLoans(email.to_string()).into());
        }
        if loans.iter().any(|loan| !loan.is_returned()) {
            warn!(email, "Refusing to delete loans while some are active");
            return Err(OrchestrationError::UserHasActiveLoans(email.to_string()).into());
        }

        let deleted = self.loans.delete_by_user(user_id).await?;
        info!(email, deleted, "Loans deleted");

        Ok(deleted)
    }

    /// Lists the loans of a user.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the user does not exist.
    pub async fn list_loans(&self, email: &str, only_active: bool) -> Result<Vec<Loan>, AppError> {
        let user = self.find_user(email).await?;
        self.loans.find_by_user(stored_id(&user)?, only_active).await
    }

    /// Retrieves a loan by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the loan does not exist.
    pub async fn get_loan(&self, loan_id: i64) -> Result<Loan, AppError> {
        debug!(loan_id, "Looking up loan");
        self.loans
            .find_by_id(loan_id)
            .await?
            .ok_or_else(|| OrchestrationError::LoanNotFound(loan_id).into())
    }

    async fn find_user(&self, email: &str) -> Result<User, AppError> {
        self.users
            .find_by_email(email)
            .await?
            .ok_or_else(|| OrchestrationError::UserNotFound(email.to_string()).into())
    }
}

fn stored_id(user: &User) -> Result<i64, AppError> {
    user.id().ok_or_else(|| {
        AppError::internal(
            "User record has no id",
            json!({ "email": user.email() }),
        )
    })
}
