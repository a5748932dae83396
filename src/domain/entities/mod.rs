//! Core domain entities of the lending model.
//!
//! Entities keep their invariants behind private fields: every mutation goes
//! through a method that validates it and reports a
//! [`crate::domain::errors::ValidationError`] on failure.
//!
//! # Entity Types
//!
//! - [`Publication`] - A lendable book or magazine with an available-copy counter
//! - [`User`] - A borrower
//! - [`Membership`] - A yearly tier with a free-loan quota
//! - [`Loan`] - A user borrowing publications over a date range
//!
//! # Lifecycle
//!
//! Entities start without an id. Repositories assign it on `create` and
//! rebuild stored records through the `restore` constructors, which skip
//! creation-time date checks.

pub mod loan;
pub mod membership;
pub mod publication;
pub mod user;

pub use loan::{LOAN_PERIOD_DAYS, Loan, LoanStatus};
pub use membership::{Membership, MembershipType, one_year_after};
pub use publication::{Publication, PublicationKind};
pub use user::User;
