//! DTOs for membership endpoints.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::Membership;

/// Request body for `POST /api/memberships`.
///
/// `end_date` defaults to one year after `start_date`; `membership_type` is
/// matched case-insensitively against `BRONZE`, `SILVER` and `GOLD`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateMembershipRequest {
    #[validate(length(min = 1, max = 254))]
    pub email: String,

    pub start_date: NaiveDate,

    #[serde(default)]
    pub end_date: Option<NaiveDate>,

    #[validate(length(min = 1, max = 16))]
    pub membership_type: String,

    pub free_loans: i32,
}

/// JSON representation of a membership.
#[derive(Debug, Serialize)]
pub struct MembershipResponse {
    pub id: Option<i64>,
    pub user_id: i64,
    pub membership_type: &'static str,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub free_loans: i32,
}

impl From<&Membership> for MembershipResponse {
    fn from(membership: &Membership) -> Self {
        Self {
            id: membership.id(),
            user_id: membership.user_id(),
            membership_type: membership.membership_type().as_str(),
            start_date: membership.start_date(),
            end_date: membership.end_date(),
            free_loans: membership.free_loans(),
        }
    }
}
