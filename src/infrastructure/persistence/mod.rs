//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx runtime
//! queries mapped through `FromRow` structs.
//!
//! # Repositories
//!
//! - [`PgUserRepository`] - Borrower accounts
//! - [`PgPublicationRepository`] - Books and magazines with their stock
//! - [`PgMembershipRepository`] - Membership tiers and free-loan quotas
//! - [`PgLoanRepository`] - Loans, their publications and copy bookkeeping

pub mod pg_loan_repository;
pub mod pg_membership_repository;
pub mod pg_publication_repository;
pub mod pg_user_repository;

pub use pg_loan_repository::PgLoanRepository;
pub use pg_membership_repository::PgMembershipRepository;
pub use pg_publication_repository::PgPublicationRepository;
pub use pg_user_repository::PgUserRepository;
