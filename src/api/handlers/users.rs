//! Handlers for user endpoints.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::user::{CreateUserRequest, UserResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Registers a borrower.
///
/// # Endpoint
///
/// `POST /api/users`
///
/// # Request Body
///
/// ```json
/// { "name": "Ada", "age": 36, "email": "ada@example.com", "password": "s3cret-pw" }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request for invalid fields.
/// Returns 409 Conflict if the email is already registered.
pub async fn create_user_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    payload.validate()?;

    let user = state
        .user_service
        .create_user(payload.name, payload.age, payload.email, &payload.password)
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

/// Looks up a borrower by email.
///
/// # Endpoint
///
/// `GET /api/users/{email}`
///
/// # Errors
///
/// Returns 404 Not Found if no user has this email.
pub async fn get_user_handler(
    Path(email): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<UserResponse>, AppError> {
    let user = state.user_service.get_user(&email).await?;

    Ok(Json(UserResponse::from(&user)))
}
