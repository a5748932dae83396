//! Repository trait definitions for the domain layer.
//!
//! This module defines the repository interfaces (traits) that abstract data access
//! operations following the Repository pattern. These traits are implemented by
//! concrete repositories in the infrastructure layer.
//!
//! # Architecture
//!
//! - Traits define the contract for data operations
//! - PostgreSQL implementations live in `crate::infrastructure::persistence`
//! - In-process implementations live in `crate::infrastructure::memory`
//! - Mock implementations are auto-generated via `mockall` for testing
//!
//! # Available Repositories
//!
//! - [`UserRepository`] - User lookup by email
//! - [`PublicationRepository`] - Books and magazines
//! - [`MembershipRepository`] - Membership windows and quotas
//! - [`LoanRepository`] - Loans and the copy counts they move

pub mod loan_repository;
pub mod membership_repository;
pub mod publication_repository;
pub mod user_repository;

pub use loan_repository::{LoanRepository, ReturnCharge, SettledReturn};
pub use membership_repository::MembershipRepository;
pub use publication_repository::PublicationRepository;
pub use user_repository::UserRepository;

#[cfg(test)]
pub use loan_repository::MockLoanRepository;
#[cfg(test)]
pub use membership_repository::MockMembershipRepository;
#[cfg(test)]
pub use publication_repository::MockPublicationRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
