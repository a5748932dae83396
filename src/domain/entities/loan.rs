//! Loan entity and its `Active` → `Returned` state machine.

use chrono::{Duration, NaiveDate};
use std::collections::HashSet;

use crate::domain::clock::Clock;
use crate::domain::entities::{Publication, User};
use crate::domain::errors::ValidationError;

/// Length of a loan before it becomes late.
pub const LOAN_PERIOD_DAYS: i64 = 30;

/// Lifecycle state of a loan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoanStatus {
    Active,
    Returned,
}

impl LoanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Returned => "returned",
        }
    }
}

/// A user borrowing one or more publications.
///
/// The loan holds snapshots of its publications and applies the copy-count
/// changes of the lend and return transitions to them. Persistence applies the
/// same changes to the stored counts as relative updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loan {
    id: Option<i64>,
    user_id: i64,
    publications: Vec<Publication>,
    start_date: NaiveDate,
    end_date: NaiveDate,
    return_date: Option<NaiveDate>,
    price: i64,
}

impl Loan {
    /// Opens a loan and lends one copy of every publication.
    ///
    /// All copy counts are checked before any of them is decremented, so a
    /// failed call leaves every publication untouched.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::MissingUser`] when the user has not been stored
    /// - [`ValidationError::InvalidPublications`] for an empty list or a
    ///   publication listed twice
    /// - [`ValidationError::FutureStartDate`] when `start_date` is after today
    /// - [`ValidationError::NoAvailableCopies`] naming the first publication
    ///   without stock
    pub fn open(
        user: &User,
        mut publications: Vec<Publication>,
        start_date: NaiveDate,
        clock: &dyn Clock,
    ) -> Result<Self, ValidationError> {
        let user_id = user.id().ok_or(ValidationError::MissingUser)?;

        if publications.is_empty() {
            return Err(ValidationError::InvalidPublications(
                "a loan needs at least one publication".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for id in publications.iter().filter_map(Publication::id) {
            if !seen.insert(id) {
                return Err(ValidationError::InvalidPublications(format!(
                    "publication {id} is listed more than once"
                )));
            }
        }

        if start_date > clock.today() {
            return Err(ValidationError::FutureStartDate(start_date));
        }

        if let Some(empty) = publications.iter().find(|p| !p.is_available()) {
            return Err(ValidationError::NoAvailableCopies {
                title: empty.title().to_string(),
            });
        }
        for publication in &mut publications {
            publication.lend_one_copy()?;
        }

        Ok(Self {
            id: None,
            user_id,
            publications,
            start_date,
            end_date: start_date + Duration::days(LOAN_PERIOD_DAYS),
            return_date: None,
            price: 0,
        })
    }

    /// Rebuilds a stored loan.
    pub fn restore(
        id: i64,
        user_id: i64,
        publications: Vec<Publication>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        return_date: Option<NaiveDate>,
        price: i64,
    ) -> Self {
        Self {
            id: Some(id),
            user_id,
            publications,
            start_date,
            end_date,
            return_date,
            price,
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

    pub fn publications(&self) -> &[Publication] {
        &self.publications
    }

    /// Storage ids of the loaned publications.
    pub fn publication_ids(&self) -> Vec<i64> {
        self.publications.iter().filter_map(Publication::id).collect()
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    pub fn return_date(&self) -> Option<NaiveDate> {
        self.return_date
    }

    pub fn price(&self) -> i64 {
        self.price
    }

    pub fn status(&self) -> LoanStatus {
        if self.return_date.is_some() {
            LoanStatus::Returned
        } else {
            LoanStatus::Active
        }
    }

    pub fn is_returned(&self) -> bool {
        self.return_date.is_some()
    }

    /// Closes the loan and returns one copy of every publication.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::AlreadyReturned`] on a second call
    /// - [`ValidationError::ReturnDateBeforeStartDate`] when `date` precedes
    ///   the start date
    /// - [`ValidationError::FutureReturnDate`] when `date` is after today
    pub fn set_return_date(
        &mut self,
        date: NaiveDate,
        clock: &dyn Clock,
    ) -> Result<(), ValidationError> {
        if self.return_date.is_some() {
            return Err(ValidationError::AlreadyReturned);
        }
        if date < self.start_date {
            return Err(ValidationError::ReturnDateBeforeStartDate {
                return_date: date,
                start_date: self.start_date,
            });
        }
        if date > clock.today() {
            return Err(ValidationError::FutureReturnDate(date));
        }

        self.return_date = Some(date);
        self.return_publications();
        Ok(())
    }

    /// Moves the due date of an active loan.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::AlreadyReturned`] once the loan is closed
    /// - [`ValidationError::EndDateBeforeStartDate`] when `date` precedes the
    ///   start date
    pub fn adjust_end_date(&mut self, date: NaiveDate) -> Result<(), ValidationError> {
        if self.return_date.is_some() {
            return Err(ValidationError::AlreadyReturned);
        }
        if date < self.start_date {
            return Err(ValidationError::EndDateBeforeStartDate {
                end_date: date,
                start_date: self.start_date,
            });
        }
        self.end_date = date;
        Ok(())
    }

    /// Days between start and return, once returned.
    pub fn days_on_loan(&self) -> Option<i64> {
        self.return_date
            .map(|returned| (returned - self.start_date).num_days())
    }

    /// Days past the end date, once returned. Zero for an on-time return.
    pub fn late_days(&self) -> Option<i64> {
        self.return_date
            .map(|returned| (returned - self.end_date).num_days().max(0))
    }

    fn return_publications(&mut self) {
        for publication in &mut self.publications {
            publication.return_one_copy();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::clock::FixedClock;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn clock() -> FixedClock {
        FixedClock::new(date(2024, 3, 1))
    }

    fn user() -> User {
        User::new("Ada", 36, "ada@example.com", "password1")
            .unwrap()
            .with_id(1)
    }

    fn book(id: i64, title: &str, copies: i32) -> Publication {
        Publication::book(title, "Author", "9780441013593", 1990, copies, &clock())
            .unwrap()
            .with_id(id)
    }

    #[test]
    fn test_open_sets_dates_and_price() {
        let loan = Loan::open(&user(), vec![book(1, "Dune", 3)], date(2024, 1, 1), &clock())
            .unwrap();

        assert_eq!(loan.id(), None);
        assert_eq!(loan.user_id(), 1);
        assert_eq!(loan.start_date(), date(2024, 1, 1));
        assert_eq!(loan.end_date(), date(2024, 1, 31));
        assert_eq!(loan.return_date(), None);
        assert_eq!(loan.price(), 0);
        assert_eq!(loan.status(), LoanStatus::Active);
        assert_eq!(loan.publications()[0].available_copies(), 2);
    }

    #[test]
    fn test_end_date_is_thirty_days_after_start() {
        for start in [date(2023, 12, 15), date(2024, 2, 1), date(2024, 3, 1)] {
            let loan = Loan::open(&user(), vec![book(1, "Dune", 1)], start, &clock()).unwrap();
            assert_eq!(loan.end_date() - loan.start_date(), Duration::days(30));
            assert_eq!(loan.price(), 0);
        }
    }

    #[test]
    fn test_open_requires_stored_user() {
        let unsaved = User::new("Ada", 36, "ada@example.com", "password1").unwrap();
        let err = Loan::open(&unsaved, vec![book(1, "Dune", 1)], date(2024, 1, 1), &clock())
            .unwrap_err();

        assert_eq!(err, ValidationError::MissingUser);
    }

    #[test]
    fn test_open_rejects_empty_and_duplicate_publications() {
        let err = Loan::open(&user(), vec![], date(2024, 1, 1), &clock()).unwrap_err();
        assert_eq!(err.kind(), "InvalidPublications");

        let err = Loan::open(
            &user(),
            vec![book(1, "Dune", 2), book(1, "Dune", 2)],
            date(2024, 1, 1),
            &clock(),
        )
        .unwrap_err();
        assert_eq!(err.kind(), "InvalidPublications");
    }

    #[test]
    fn test_open_rejects_future_start_date() {
        let err = Loan::open(&user(), vec![book(1, "Dune", 1)], date(2024, 3, 2), &clock())
            .unwrap_err();

        assert_eq!(err, ValidationError::FutureStartDate(date(2024, 3, 2)));
    }

    #[test]
    fn test_open_without_copies_names_title() {
        let err = Loan::open(
            &user(),
            vec![book(1, "Dune", 1), book(2, "Emma", 0)],
            date(2024, 1, 1),
            &clock(),
        )
        .unwrap_err();

        assert_eq!(
            err,
            ValidationError::NoAvailableCopies {
                title: "Emma".to_string()
            }
        );
    }

    #[test]
    fn test_return_restores_copies() {
        let mut loan = Loan::open(
            &user(),
            vec![book(1, "Dune", 3), book(2, "Emma", 1)],
            date(2024, 1, 1),
            &clock(),
        )
        .unwrap();
        assert_eq!(loan.publications()[1].available_copies(), 0);

        loan.set_return_date(date(2024, 1, 20), &clock()).unwrap();

        assert_eq!(loan.status(), LoanStatus::Returned);
        assert_eq!(loan.return_date(), Some(date(2024, 1, 20)));
        assert_eq!(loan.publications()[0].available_copies(), 3);
        assert_eq!(loan.publications()[1].available_copies(), 1);
    }

    #[test]
    fn test_return_only_once() {
        let mut loan =
            Loan::open(&user(), vec![book(1, "Dune", 3)], date(2024, 1, 1), &clock()).unwrap();

        loan.set_return_date(date(2024, 1, 2), &clock()).unwrap();
        let err = loan.set_return_date(date(2024, 1, 3), &clock()).unwrap_err();

        assert_eq!(err, ValidationError::AlreadyReturned);
        assert_eq!(loan.return_date(), Some(date(2024, 1, 2)));
        assert_eq!(loan.publications()[0].available_copies(), 3);
    }

    #[test]
    fn test_return_date_bounds() {
        let mut loan =
            Loan::open(&user(), vec![book(1, "Dune", 3)], date(2024, 1, 10), &clock()).unwrap();

        let err = loan.set_return_date(date(2024, 1, 9), &clock()).unwrap_err();
        assert_eq!(err.kind(), "ReturnDateBeforeStartDate");

        let err = loan.set_return_date(date(2024, 3, 2), &clock()).unwrap_err();
        assert_eq!(err, ValidationError::FutureReturnDate(date(2024, 3, 2)));

        assert_eq!(loan.status(), LoanStatus::Active);
        assert!(loan.set_return_date(date(2024, 1, 10), &clock()).is_ok());
    }

    #[test]
    fn test_adjust_end_date() {
        let mut loan =
            Loan::open(&user(), vec![book(1, "Dune", 3)], date(2024, 1, 10), &clock()).unwrap();

        loan.adjust_end_date(date(2024, 2, 20)).unwrap();
        assert_eq!(loan.end_date(), date(2024, 2, 20));

        let err = loan.adjust_end_date(date(2024, 1, 1)).unwrap_err();
        assert_eq!(err.kind(), "EndDateBeforeStartDate");

        loan.set_return_date(date(2024, 2, 1), &clock()).unwrap();
        assert_eq!(
            loan.adjust_end_date(date(2024, 3, 1)),
            Err(ValidationError::AlreadyReturned)
        );
    }

    #[test]
    fn test_day_counters() {
        let mut loan =
            Loan::open(&user(), vec![book(1, "Dune", 3)], date(2024, 1, 1), &clock()).unwrap();
        assert_eq!(loan.days_on_loan(), None);
        assert_eq!(loan.late_days(), None);

        loan.set_return_date(date(2024, 2, 5), &clock()).unwrap();
        assert_eq!(loan.days_on_loan(), Some(35));
        assert_eq!(loan.late_days(), Some(5));
    }
}
