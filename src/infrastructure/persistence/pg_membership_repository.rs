//! PostgreSQL implementation of membership repository.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Membership, MembershipType};
use crate::domain::repositories::MembershipRepository;
use crate::error::AppError;

#[derive(sqlx::FromRow)]
struct MembershipRow {
    id: i64,
    user_id: i64,
    start_date: NaiveDate,
    end_date: NaiveDate,
    membership_type: String,
    free_loans: i32,
}

impl TryFrom<MembershipRow> for Membership {
    type Error = AppError;

    fn try_from(row: MembershipRow) -> Result<Self, Self::Error> {
        let membership_type: MembershipType = row.membership_type.parse().map_err(|_| {
            AppError::internal(
                "Malformed membership row",
                json!({ "id": row.id, "membership_type": row.membership_type }),
            )
        })?;

        Ok(Membership::restore(
            row.id,
            row.user_id,
            row.start_date,
            row.end_date,
            membership_type,
            row.free_loans,
        ))
    }
}

const MEMBERSHIP_COLUMNS: &str = "id, user_id, start_date, end_date, membership_type, free_loans";

/// PostgreSQL repository for memberships.
pub struct PgMembershipRepository {
    pool: Arc<PgPool>,
}

impl PgMembershipRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MembershipRepository for PgMembershipRepository {
    async fn create(&self, membership: Membership) -> Result<Membership, AppError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO memberships (user_id, start_date, end_date, membership_type, free_loans)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(membership.user_id())
        .bind(membership.start_date())
        .bind(membership.end_date())
        .bind(membership.membership_type().as_str())
        .bind(membership.free_loans())
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(membership.with_id(id))
    }

    async fn update(&self, membership: &Membership) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE memberships SET free_loans = $2 WHERE id = $1")
            .bind(membership.id())
            .bind(membership.free_loans())
            .execute(self.pool.as_ref())
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(
                "Membership not found",
                json!({ "id": membership.id() }),
            ));
        }

        Ok(())
    }

    async fn find_active(
        &self,
        user_id: i64,
        date: NaiveDate,
    ) -> Result<Option<Membership>, AppError> {
        let row: Option<MembershipRow> = sqlx::query_as(&format!(
            r#"
            SELECT {MEMBERSHIP_COLUMNS}
            FROM memberships
            WHERE user_id = $1 AND start_date <= $2 AND $2 < end_date
            ORDER BY start_date DESC
            LIMIT 1
            "#
        ))
        .bind(user_id)
        .bind(date)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(Membership::try_from).transpose()
    }

    async fn find_by_user(&self, user_id: i64) -> Result<Vec<Membership>, AppError> {
        let rows: Vec<MembershipRow> = sqlx::query_as(&format!(
            "SELECT {MEMBERSHIP_COLUMNS} FROM memberships WHERE user_id = $1 ORDER BY start_date"
        ))
        .bind(user_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        rows.into_iter().map(Membership::try_from).collect()
    }
}
