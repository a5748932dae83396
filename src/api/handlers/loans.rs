//! Handlers for loan registration, return and cleanup.

use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::loan::{
    CreateLoanRequest, DeleteLoansResponse, LoanListParams, LoanResponse, ReturnLoanRequest,
    ReturnReceiptResponse,
};
use crate::error::AppError;
use crate::state::AppState;

/// Registers a loan of one or more publications.
///
/// # Endpoint
///
/// `POST /api/loans`
///
/// # Request Body
///
/// ```json
/// { "email": "ada@example.com", "start_date": "2024-03-01", "publication_ids": [1, 2] }
/// ```
///
/// `start_date` is optional and defaults to today. The loan ends 30 days
/// after it starts.
///
/// # Errors
///
/// Returns 400 Bad Request for an empty or duplicated publication list, a
/// start date in the future, or a publication without available copies.
/// Returns 404 Not Found if the user or a publication does not exist.
/// Returns 409 Conflict if a concurrent loan took the last copy.
pub async fn create_loan_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateLoanRequest>,
) -> Result<(StatusCode, Json<LoanResponse>), AppError> {
    payload.validate()?;

    let start_date = payload.start_date.unwrap_or_else(|| state.clock.today());

    let loan = state
        .loan_service
        .register_loan(&payload.email, start_date, payload.publication_ids)
        .await?;

    Ok((StatusCode::CREATED, Json(LoanResponse::from(&loan))))
}

/// Returns a loan and reports the amounts due.
///
/// # Endpoint
///
/// `POST /api/loans/{id}/return`
///
/// # Request Body
///
/// Optional. Without a body the loan is returned today.
///
/// ```json
/// { "return_date": "2024-04-10" }
/// ```
///
/// # Response
///
/// ```json
/// { "loan_id": 1, "price": 30, "fine": 5, "late_days": 10, "total": 35, "free_loan_redeemed": false }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request for a malformed date, a date before the start or
/// in the future, or a loan that is already returned.
/// Returns 404 Not Found if the loan does not exist.
pub async fn return_loan_handler(
    Path(loan_id): Path<i64>,
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ReturnReceiptResponse>, AppError> {
    let request: ReturnLoanRequest = if body.is_empty() {
        ReturnLoanRequest::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| {
            AppError::bad_request(
                "Malformed request body",
                json!({ "kind": "InvalidRequest", "reason": e.to_string() }),
            )
        })?
    };
    let return_date = request
        .parsed_return_date()?
        .unwrap_or_else(|| state.clock.today());

    let receipt = state
        .loan_service
        .return_loan(loan_id, return_date)
        .await?;

    Ok(Json(ReturnReceiptResponse::from(receipt)))
}

/// Lists the loans of a user, newest first.
///
/// # Endpoint
///
/// `GET /api/users/{email}/loans?active=true`
///
/// # Errors
///
/// Returns 404 Not Found if the user does not exist.
pub async fn list_user_loans_handler(
    Path(email): Path<String>,
    Query(params): Query<LoanListParams>,
    State(state): State<AppState>,
) -> Result<Json<Vec<LoanResponse>>, AppError> {
    let loans = state
        .loan_service
        .list_loans(&email, params.active.unwrap_or(false))
        .await?;

    Ok(Json(loans.iter().map(LoanResponse::from).collect()))
}

/// Deletes the loan history of a user.
///
/// # Endpoint
///
/// `DELETE /api/users/{email}/loans`
///
/// # Errors
///
/// Returns 404 Not Found if the user does not exist.
/// Returns 409 Conflict if the user has no loans or still has an active one.
pub async fn delete_user_loans_handler(
    Path(email): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<DeleteLoansResponse>, AppError> {
    let deleted = state.loan_service.delete_loans_by_user(&email).await?;

    Ok(Json(DeleteLoansResponse { deleted }))
}
