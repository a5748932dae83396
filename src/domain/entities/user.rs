//! User entity: the borrower identity referenced by loans and memberships.

use sha2::{Digest, Sha256};

use crate::domain::errors::ValidationError;

const MAX_AGE: i32 = 101;
const MIN_PASSWORD_LEN: usize = 8;

/// A validated library user.
///
/// Only a SHA-256 fingerprint of the password is kept; the raw value is
/// dropped after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: Option<i64>,
    name: String,
    age: i32,
    email: String,
    password_hash: String,
}

impl User {
    /// Validates the fields of a new user.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::BlankName`] for an empty or whitespace name
    /// - [`ValidationError::InvalidAge`] when age is outside `0..=101`
    /// - [`ValidationError::InvalidEmail`] when `@` or `.` is missing
    /// - [`ValidationError::ShortPassword`] for fewer than 8 characters
    pub fn new(
        name: impl Into<String>,
        age: i32,
        email: impl Into<String>,
        password: &str,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        let email = email.into();

        if name.trim().is_empty() {
            return Err(ValidationError::BlankName);
        }
        if !(0..=MAX_AGE).contains(&age) {
            return Err(ValidationError::InvalidAge(age));
        }
        if !email.contains('@') || !email.contains('.') {
            return Err(ValidationError::InvalidEmail);
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::ShortPassword);
        }

        Ok(Self {
            id: None,
            name,
            age,
            email,
            password_hash: hash_password(password),
        })
    }

    /// Rebuilds a stored user.
    pub fn restore(id: i64, name: String, age: i32, email: String, password_hash: String) -> Self {
        Self {
            id: Some(id),
            name,
            age,
            email,
            password_hash,
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn age(&self) -> i32 {
        self.age
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    /// Compares a candidate password against the stored fingerprint.
    pub fn password_matches(&self, candidate: &str) -> bool {
        hash_password(candidate) == self.password_hash
    }
}

fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}
