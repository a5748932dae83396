//! DTOs for loan endpoints.

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};
use std::sync::LazyLock;
use validator::Validate;

use crate::api::dto::publication::PublicationResponse;
use crate::application::services::ReturnReceipt;
use crate::domain::entities::Loan;
use crate::domain::errors::ValidationError;

/// Compiled regex for `YYYY-MM-DD` dates.
static ISO_DATE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

/// Request body for `POST /api/loans`.
///
/// `start_date` defaults to today.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLoanRequest {
    #[validate(length(min = 1, max = 254))]
    pub email: String,

    #[serde(default)]
    pub start_date: Option<NaiveDate>,

    #[validate(length(max = 100))]
    pub publication_ids: Vec<i64>,
}

/// Request body for `POST /api/loans/{id}/return`.
///
/// `return_date` defaults to today. It is kept as text so a malformed date is
/// reported as an `InvalidReturnDate` violation rather than a body rejection.
#[derive(Debug, Default, Deserialize)]
pub struct ReturnLoanRequest {
    pub return_date: Option<String>,
}

impl ReturnLoanRequest {
    /// Parses the requested return date, if any.
    ///
    /// Only zero-padded `YYYY-MM-DD` naming a real calendar day is accepted.
    pub fn parsed_return_date(&self) -> Result<Option<NaiveDate>, ValidationError> {
        self.return_date
            .as_deref()
            .map(|raw| {
                if !ISO_DATE_REGEX.is_match(raw) {
                    return Err(ValidationError::InvalidReturnDate);
                }
                NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .map_err(|_| ValidationError::InvalidReturnDate)
            })
            .transpose()
    }
}

/// Query parameters for `GET /api/users/{email}/loans`.
#[serde_as]
#[derive(Debug, Deserialize)]
pub struct LoanListParams {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub active: Option<bool>,
}

/// JSON representation of a loan with its publications.
#[derive(Debug, Serialize)]
pub struct LoanResponse {
    pub id: Option<i64>,
    pub user_id: i64,
    pub status: &'static str,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub price: i64,
    pub publications: Vec<PublicationResponse>,
}

impl From<&Loan> for LoanResponse {
    fn from(loan: &Loan) -> Self {
        Self {
            id: loan.id(),
            user_id: loan.user_id(),
            status: loan.status().as_str(),
            start_date: loan.start_date(),
            end_date: loan.end_date(),
            return_date: loan.return_date(),
            price: loan.price(),
            publications: loan
                .publications()
                .iter()
                .map(PublicationResponse::from)
                .collect(),
        }
    }
}

/// Amounts due for a returned loan.
#[derive(Debug, Serialize)]
pub struct ReturnReceiptResponse {
    pub loan_id: i64,
    pub price: i64,
    pub fine: i64,
    pub late_days: i64,
    pub total: i64,
    pub free_loan_redeemed: bool,
}

impl From<ReturnReceipt> for ReturnReceiptResponse {
    fn from(receipt: ReturnReceipt) -> Self {
        Self {
            total: receipt.total(),
            loan_id: receipt.loan_id,
            price: receipt.price,
            fine: receipt.fine,
            late_days: receipt.late_days,
            free_loan_redeemed: receipt.free_loan_redeemed,
        }
    }
}

/// Response for `DELETE /api/users/{email}/loans`.
#[derive(Debug, Serialize)]
pub struct DeleteLoansResponse {
    pub deleted: u64,
}
