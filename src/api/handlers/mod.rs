//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod health;
pub mod loans;
pub mod memberships;
pub mod publications;
pub mod users;

pub use health::health_handler;
pub use loans::{
    create_loan_handler, delete_user_loans_handler, list_user_loans_handler, return_loan_handler,
};
pub use memberships::{active_membership_handler, create_membership_handler};
pub use publications::{
    create_book_handler, create_magazine_handler, get_publication_handler,
    list_publications_handler,
};
pub use users::{create_user_handler, get_user_handler};
