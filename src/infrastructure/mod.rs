//! Infrastructure layer for storage backends.
//!
//! This layer implements the repository interfaces defined by the domain layer.
//!
//! # Modules
//!
//! - [`memory`] - In-process store used without a database
//! - [`persistence`] - PostgreSQL repository implementations

pub mod memory;
pub mod persistence;
