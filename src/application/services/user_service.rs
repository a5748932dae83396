//! User registration service.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::entities::User;
use crate::domain::errors::OrchestrationError;
use crate::domain::repositories::UserRepository;
use crate::error::AppError;

/// Service for registering and looking up borrowers.
pub struct UserService {
    repository: Arc<dyn UserRepository>,
}

impl UserService {
    /// Creates a new user service.
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    /// Registers a new user.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for invalid fields.
    /// Returns [`AppError::Conflict`] if the email is already registered.
    pub async fn create_user(
        &self,
        name: String,
        age: i32,
        email: String,
        password: &str,
    ) -> Result<User, AppError> {
        let user = User::new(name, age, email, password)?;

        if self.repository.find_by_email(user.email()).await?.is_some() {
            warn!(email = user.email(), "Email already registered");
            return Err(OrchestrationError::UserAlreadyExists(user.email().to_string()).into());
        }

        let created = self.repository.create(user).await?;
        info!(id = ?created.id(), email = created.email(), "User registered");

        Ok(created)
    }

    /// Retrieves a user by email.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the user does not exist.
    pub async fn get_user(&self, email: &str) -> Result<User, AppError> {
        self.repository
            .find_by_email(email)
            .await?
            .ok_or_else(|| OrchestrationError::UserNotFound(email.to_string()).into())
    }

    /// Counts registered users.
    pub async fn count_users(&self) -> Result<i64, AppError> {
        self.repository.count().await
    }
}
