//! Membership subscription service.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::domain::clock::Clock;
use crate::domain::entities::{Membership, MembershipType, one_year_after};
use crate::domain::errors::OrchestrationError;
use crate::domain::repositories::{MembershipRepository, UserRepository};
use crate::error::AppError;

/// Service for subscribing users to membership tiers.
///
/// A user holds at most one membership for any given day: new windows must
/// not overlap existing ones.
pub struct MembershipService {
    users: Arc<dyn UserRepository>,
    memberships: Arc<dyn MembershipRepository>,
    clock: Arc<dyn Clock>,
}

impl MembershipService {
    /// Creates a new membership service.
    pub fn new(
        users: Arc<dyn UserRepository>,
        memberships: Arc<dyn MembershipRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            memberships,
            clock,
        }
    }

    /// Subscribes the user with `email` to a membership.
    ///
    /// `end_date` defaults to exactly one year after `start_date`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the user does not exist.
    /// Returns [`AppError::Validation`] for membership rule violations.
    /// Returns [`AppError::Conflict`] if the window overlaps another
    /// membership of the same user.
    pub async fn create_membership(
        &self,
        email: &str,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
        membership_type: MembershipType,
        free_loans: i32,
    ) -> Result<Membership, AppError> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| OrchestrationError::UserNotFound(email.to_string()))?;
        let user_id = user
            .id()
            .ok_or_else(|| OrchestrationError::UserNotFound(email.to_string()))?;

        let membership = Membership::new(
            user_id,
            start_date,
            end_date.unwrap_or_else(|| one_year_after(start_date)),
            membership_type,
            free_loans,
            self.clock.as_ref(),
        )?;

        let existing = self.memberships.find_by_user(user_id).await?;
        if existing.iter().any(|other| other.overlaps(&membership)) {
            warn!(email, %start_date, "Membership window overlaps an existing one");
            return Err(OrchestrationError::OverlappingMembership(user_id).into());
        }

        let membership = self.memberships.create(membership).await?;
        info!(
            email,
            membership_id = ?membership.id(),
            membership_type = %membership.membership_type(),
            free_loans,
            "Membership created"
        );

        Ok(membership)
    }

    /// Returns the membership of the user that is active today, if any.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the user does not exist.
    pub async fn get_active_membership(&self, email: &str) -> Result<Option<Membership>, AppError> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| OrchestrationError::UserNotFound(email.to_string()))?;
        let Some(user_id) = user.id() else {
            return Ok(None);
        };

        self.memberships
            .find_active(user_id, self.clock.today())
            .await
    }
}
