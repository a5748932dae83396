//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating repository calls,
//! entity rules and the clock. Services consume repository traits and provide
//! a clean API for HTTP handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::loan_service::LoanService`] - Loan registration, return pricing and cleanup
//! - [`services::membership_service::MembershipService`] - Membership subscriptions
//! - [`services::publication_service::PublicationService`] - Book and magazine catalogue
//! - [`services::user_service::UserService`] - Borrower registration

pub mod services;
