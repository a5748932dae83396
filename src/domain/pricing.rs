//! Return price and late-fine calculation.
//!
//! Multipliers are expressed in quarter units so every result is exact integer
//! arithmetic: `floor(days * multiplier * count)` becomes
//! `days * quarters * count / 4` over non-negative operands.

use crate::domain::entities::{Loan, Membership};
use crate::domain::errors::ValidationError;

/// Full price multiplier (1.0) in quarters.
const FULL_PRICE_QUARTERS: i64 = 4;

/// Stateless price and fine rules applied when a loan is returned.
#[derive(Debug, Clone, Copy, Default)]
pub struct PricingEngine;

impl PricingEngine {
    /// Price due for a returned loan.
    ///
    /// Without a membership the full rate applies. A membership with a free
    /// loan left redeems it and the price is zero; otherwise the tier
    /// multiplier (BRONZE 0.75, SILVER 0.5, GOLD 0.25) applies.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::LoanNotReturned`] for an active loan.
    pub fn calculate_return_price(
        &self,
        loan: &Loan,
        membership: Option<&mut Membership>,
    ) -> Result<i64, ValidationError> {
        match membership {
            Some(membership) if membership.has_free_loan() => {
                loan.days_on_loan().ok_or(ValidationError::LoanNotReturned)?;
                if membership.redeem_free_loan().is_ok() {
                    return Ok(0);
                }
                self.calculate_tier_price(loan, Some(membership))
            }
            membership => self.calculate_tier_price(loan, membership.as_deref()),
        }
    }

    /// Price at the tier rate of `membership`, ignoring its free-loan quota.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::LoanNotReturned`] for an active loan.
    pub fn calculate_tier_price(
        &self,
        loan: &Loan,
        membership: Option<&Membership>,
    ) -> Result<i64, ValidationError> {
        let days = loan.days_on_loan().ok_or(ValidationError::LoanNotReturned)?;
        let count = loan.publications().len() as i64;
        let quarters = membership.map_or(FULL_PRICE_QUARTERS, |m| {
            m.membership_type().price_quarters()
        });

        Ok(days.max(0) * quarters * count / 4)
    }

    /// Late fine for a returned loan: half a unit per late day and publication.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::LoanNotReturned`] for an active loan.
    pub fn calculate_fine(&self, loan: &Loan) -> Result<i64, ValidationError> {
        let late_days = loan.late_days().ok_or(ValidationError::LoanNotReturned)?;
        let count = loan.publications().len() as i64;

        Ok(late_days * count / 2)
    }
}
