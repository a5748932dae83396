//! Business logic services for the application layer.

pub mod loan_service;
pub mod membership_service;
pub mod publication_service;
pub mod user_service;

pub use loan_service::{LoanService, ReturnReceipt};
pub use membership_service::MembershipService;
pub use publication_service::PublicationService;
pub use user_service::UserService;
