//! Handlers for membership endpoints.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::membership::{CreateMembershipRequest, MembershipResponse};
use crate::domain::entities::MembershipType;
use crate::error::AppError;
use crate::state::AppState;

/// Subscribes a user to a membership tier.
///
/// # Endpoint
///
/// `POST /api/memberships`
///
/// # Request Body
///
/// ```json
/// {
///   "email": "ada@example.com",
///   "start_date": "2024-01-01",
///   "membership_type": "SILVER",
///   "free_loans": 8
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request for an unknown tier, a start date in the past, an
/// end date other than one year after the start, or a quota outside the
/// tier's range.
/// Returns 404 Not Found if the user does not exist.
/// Returns 409 Conflict if the window overlaps another membership.
pub async fn create_membership_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateMembershipRequest>,
) -> Result<(StatusCode, Json<MembershipResponse>), AppError> {
    payload.validate()?;

    let membership_type: MembershipType = payload.membership_type.parse()?;

    let membership = state
        .membership_service
        .create_membership(
            &payload.email,
            payload.start_date,
            payload.end_date,
            membership_type,
            payload.free_loans,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MembershipResponse::from(&membership)),
    ))
}

/// Returns the membership active today for a user.
///
/// # Endpoint
///
/// `GET /api/users/{email}/membership`
///
/// # Errors
///
/// Returns 404 Not Found if the user does not exist or has no active
/// membership.
pub async fn active_membership_handler(
    Path(email): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<MembershipResponse>, AppError> {
    let membership = state
        .membership_service
        .get_active_membership(&email)
        .await?
        .ok_or_else(|| {
            AppError::not_found(
                "No active membership",
                json!({ "kind": "NoActiveMembership", "email": email }),
            )
        })?;

    Ok(Json(MembershipResponse::from(&membership)))
}
