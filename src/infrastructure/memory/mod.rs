//! Database-free storage backend.
//!
//! Used when no `DATABASE_URL` is configured, and by the HTTP tests. All
//! repositories share one [`MemoryStore`], so a loan sees the same copy counts
//! the publication repository reports.

mod loan_repository;
mod membership_repository;
mod publication_repository;
mod store;
mod user_repository;

pub use loan_repository::InMemoryLoanRepository;
pub use membership_repository::InMemoryMembershipRepository;
pub use publication_repository::InMemoryPublicationRepository;
pub use store::MemoryStore;
pub use user_repository::InMemoryUserRepository;
