//! Membership entity: a one-year subscription tier with a free-loan quota.

use chrono::{Months, NaiveDate};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use crate::domain::clock::Clock;
use crate::domain::errors::{OrchestrationError, ValidationError};

/// Membership tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MembershipType {
    Bronze,
    Silver,
    Gold,
}

impl MembershipType {
    pub const ALL: [MembershipType; 3] = [Self::Bronze, Self::Silver, Self::Gold];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bronze => "BRONZE",
            Self::Silver => "SILVER",
            Self::Gold => "GOLD",
        }
    }

    /// Allowed free-loan quota for this tier.
    pub fn free_loan_range(&self) -> RangeInclusive<i32> {
        match self {
            Self::Bronze => 0..=5,
            Self::Silver => 6..=10,
            Self::Gold => 11..=15,
        }
    }

    /// Price multiplier in quarters: BRONZE 0.75, SILVER 0.5, GOLD 0.25.
    pub fn price_quarters(&self) -> i64 {
        match self {
            Self::Bronze => 3,
            Self::Silver => 2,
            Self::Gold => 1,
        }
    }
}

impl fmt::Display for MembershipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MembershipType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BRONZE" => Ok(Self::Bronze),
            "SILVER" => Ok(Self::Silver),
            "GOLD" => Ok(Self::Gold),
            _ => Err(ValidationError::InvalidMembershipType(s.to_string())),
        }
    }
}

/// Returns the date exactly one calendar year after `start`.
///
/// February 29 maps to February 28 of the following year.
pub fn one_year_after(start: NaiveDate) -> NaiveDate {
    start
        .checked_add_months(Months::new(12))
        .unwrap_or(NaiveDate::MAX)
}

/// A user's membership.
///
/// The owning user is referenced by id only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Membership {
    id: Option<i64>,
    user_id: i64,
    start_date: NaiveDate,
    end_date: NaiveDate,
    membership_type: MembershipType,
    free_loans: i32,
}

impl Membership {
    /// Creates a validated membership.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::StartDateInPast`] when `start_date` is before today
    /// - [`ValidationError::EndDateMismatch`] unless `end_date` is exactly one
    ///   year after `start_date`
    /// - [`ValidationError::InvalidFreeLoans`] when the quota is outside the
    ///   tier's range
    pub fn new(
        user_id: i64,
        start_date: NaiveDate,
        end_date: NaiveDate,
        membership_type: MembershipType,
        free_loans: i32,
        clock: &dyn Clock,
    ) -> Result<Self, ValidationError> {
        if start_date < clock.today() {
            return Err(ValidationError::StartDateInPast(start_date));
        }
        let expected = one_year_after(start_date);
        if end_date != expected {
            return Err(ValidationError::EndDateMismatch {
                expected,
                actual: end_date,
            });
        }
        check_free_loans(membership_type, free_loans)?;

        Ok(Self {
            id: None,
            user_id,
            start_date,
            end_date,
            membership_type,
            free_loans,
        })
    }

    /// Rebuilds a stored membership.
    ///
    /// Redeemed quotas may sit below the tier minimum, so no range check runs.
    pub fn restore(
        id: i64,
        user_id: i64,
        start_date: NaiveDate,
        end_date: NaiveDate,
        membership_type: MembershipType,
        free_loans: i32,
    ) -> Self {
        Self {
            id: Some(id),
            user_id,
            start_date,
            end_date,
            membership_type,
            free_loans: free_loans.max(0),
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    pub fn membership_type(&self) -> MembershipType {
        self.membership_type
    }

    pub fn free_loans(&self) -> i32 {
        self.free_loans
    }

    /// Sets the free-loan quota.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidFreeLoans`] outside the tier's range.
    pub fn set_free_loans(&mut self, free_loans: i32) -> Result<(), ValidationError> {
        check_free_loans(self.membership_type, free_loans)?;
        self.free_loans = free_loans;
        Ok(())
    }

    pub fn has_free_loan(&self) -> bool {
        self.free_loans > 0
    }

    /// Consumes one free loan from the quota.
    ///
    /// # Errors
    ///
    /// Returns [`OrchestrationError::NoFreeLoans`] when the quota is exhausted.
    pub fn redeem_free_loan(&mut self) -> Result<(), OrchestrationError> {
        if self.free_loans <= 0 {
            return Err(OrchestrationError::NoFreeLoans);
        }
        self.free_loans -= 1;
        Ok(())
    }

    /// Whether the membership still runs on `today`.
    pub fn is_active(&self, today: NaiveDate) -> bool {
        today < self.end_date
    }

    /// Whether both windows share at least one day (bounds inclusive).
    pub fn overlaps(&self, other: &Membership) -> bool {
        self.start_date <= other.end_date && other.start_date <= self.end_date
    }
}

fn check_free_loans(membership_type: MembershipType, free_loans: i32) -> Result<(), ValidationError> {
    let range = membership_type.free_loan_range();
    if !range.contains(&free_loans) {
        return Err(ValidationError::InvalidFreeLoans {
            membership_type: membership_type.to_string(),
            min: *range.start(),
            max: *range.end(),
            actual: free_loans,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::clock::FixedClock;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn clock() -> FixedClock {
        FixedClock::new(date(2024, 1, 1))
    }

    fn bronze(free_loans: i32) -> Result<Membership, ValidationError> {
        Membership::new(
            1,
            date(2024, 1, 1),
            date(2025, 1, 1),
            MembershipType::Bronze,
            free_loans,
            &clock(),
        )
    }

    #[test]
    fn test_membership_creation() {
        let membership = bronze(2).unwrap();

        assert_eq!(membership.id(), None);
        assert_eq!(membership.user_id(), 1);
        assert_eq!(membership.membership_type(), MembershipType::Bronze);
        assert_eq!(membership.free_loans(), 2);
        assert_eq!(membership.end_date(), date(2025, 1, 1));
    }

    #[test]
    fn test_end_date_must_be_exactly_one_year_later() {
        for end in [date(2024, 12, 31), date(2025, 1, 2), date(2024, 1, 1)] {
            let err = Membership::new(1, date(2024, 1, 1), end, MembershipType::Gold, 11, &clock())
                .unwrap_err();
            assert_eq!(err.kind(), "EndDateMismatch");
        }
    }

    #[test]
    fn test_start_date_before_today_fails() {
        let clock = FixedClock::new(date(2024, 1, 2));
        let err = Membership::new(
            1,
            date(2024, 1, 1),
            date(2025, 1, 1),
            MembershipType::Bronze,
            0,
            &clock,
        )
        .unwrap_err();

        assert_eq!(err, ValidationError::StartDateInPast(date(2024, 1, 1)));
    }

    #[test]
    fn test_leap_day_end_date() {
        assert_eq!(one_year_after(date(2024, 2, 29)), date(2025, 2, 28));
    }

    #[test]
    fn test_free_loan_boundaries() {
        assert!(bronze(5).is_ok());
        assert_eq!(bronze(6).unwrap_err().kind(), "InvalidFreeLoans");
        assert_eq!(bronze(-1).unwrap_err().kind(), "InvalidFreeLoans");

        let silver = Membership::new(
            1,
            date(2024, 1, 1),
            date(2025, 1, 1),
            MembershipType::Silver,
            6,
            &clock(),
        );
        assert!(silver.is_ok());

        let gold = Membership::new(
            1,
            date(2024, 1, 1),
            date(2025, 1, 1),
            MembershipType::Gold,
            16,
            &clock(),
        );
        assert!(gold.is_err());
    }

    #[test]
    fn test_set_free_loans_respects_tier() {
        let mut membership = bronze(2).unwrap();

        assert!(membership.set_free_loans(5).is_ok());
        assert!(membership.set_free_loans(6).is_err());
        assert_eq!(membership.free_loans(), 5);
    }

    #[test]
    fn test_redeem_free_loan() {
        let mut membership = bronze(1).unwrap();

        assert!(membership.has_free_loan());
        membership.redeem_free_loan().unwrap();
        assert_eq!(membership.free_loans(), 0);
        assert!(!membership.has_free_loan());

        assert_eq!(
            membership.redeem_free_loan(),
            Err(OrchestrationError::NoFreeLoans)
        );
    }

    #[test]
    fn test_is_active() {
        let membership = bronze(0).unwrap();

        assert!(membership.is_active(date(2024, 6, 1)));
        assert!(membership.is_active(date(2024, 12, 31)));
        assert!(!membership.is_active(date(2025, 1, 1)));
    }

    #[test]
    fn test_overlaps_inclusive_bounds() {
        let first = bronze(0).unwrap();
        let touching = Membership::restore(
            2,
            1,
            date(2025, 1, 1),
            date(2026, 1, 1),
            MembershipType::Gold,
            11,
        );
        let later = Membership::restore(
            3,
            1,
            date(2025, 1, 2),
            date(2026, 1, 2),
            MembershipType::Gold,
            11,
        );

        assert!(first.overlaps(&touching));
        assert!(touching.overlaps(&first));
        assert!(!first.overlaps(&later));
        assert!(first.overlaps(&first));
    }

    #[test]
    fn test_membership_type_parsing() {
        assert_eq!("gold".parse::<MembershipType>(), Ok(MembershipType::Gold));
        assert_eq!(" Silver ".parse::<MembershipType>(), Ok(MembershipType::Silver));
        assert_eq!(
            "PLATINUM".parse::<MembershipType>(),
            Err(ValidationError::InvalidMembershipType("PLATINUM".to_string()))
        );
        assert_eq!(MembershipType::Bronze.to_string(), "BRONZE");
    }
}
