//! DTOs for user endpoints.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::User;

/// Request body for `POST /api/users`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(max = 200))]
    pub name: String,

    pub age: i32,

    #[validate(length(max = 254))]
    pub email: String,

    #[validate(length(max = 128))]
    pub password: String,
}

/// Public view of a user. The password fingerprint is never exposed.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Option<i64>,
    pub name: String,
    pub age: i32,
    pub email: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id(),
            name: user.name().to_string(),
            age: user.age(),
            email: user.email().to_string(),
        }
    }
}
