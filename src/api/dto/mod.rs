//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde for JSON serialization/deserialization and validator
//! for input validation. Domain rules (age range, ISBN, tier quotas, dates)
//! are left to the entities so their violation keys reach the client.

pub mod health;
pub mod loan;
pub mod membership;
pub mod publication;
pub mod user;
