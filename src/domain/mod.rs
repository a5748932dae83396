//! Domain layer containing the lending model.
//!
//! This module implements the core domain logic following Clean Architecture principles.
//! It defines entities, pricing rules, repository interfaces and the time source,
//! independent of infrastructure concerns.
//!
//! # Architecture
//!
//! - [`entities`] - Publications, users, memberships and loans with their invariants
//! - [`pricing`] - Return price and late fine rules
//! - [`clock`] - Injectable notion of "today"
//! - [`errors`] - Validation and orchestration error kinds
//! - [`repositories`] - Data access trait definitions
//!
//! # Design Principles
//!
//! - Domain layer has no dependencies on infrastructure or presentation layers
//! - Entity operations are synchronous and never read the wall clock directly
//! - Repository traits define contracts implemented by infrastructure layer
//! - Multi-entity flows live in services (see [`crate::application::services`])
//!
//! # Loan Flow
//!
//! 1. [`entities::Loan::open`] checks every copy count, then lends one copy each
//! 2. [`repositories::LoanRepository::create`] stores the loan and the decrements
//! 3. [`entities::Loan::set_return_date`] closes the loan and restores copies
//! 4. [`pricing::PricingEngine`] computes price and fine for the receipt

pub mod clock;
pub mod entities;
pub mod errors;
pub mod pricing;
pub mod repositories;
