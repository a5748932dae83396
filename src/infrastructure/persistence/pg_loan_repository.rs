//! PostgreSQL implementation of loan repository.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::json;
use sqlx::{PgConnection, PgPool};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use super::pg_publication_repository::{PUBLICATION_COLUMNS, PublicationRow};
use crate::domain::entities::{Loan, Publication};
use crate::domain::errors::OrchestrationError;
use crate::domain::repositories::{LoanRepository, ReturnCharge, SettledReturn};
use crate::error::AppError;

#[derive(sqlx::FromRow)]
struct LoanRow {
    id: i64,
    user_id: i64,
    start_date: NaiveDate,
    end_date: NaiveDate,
    return_date: Option<NaiveDate>,
    price: i64,
}

#[derive(sqlx::FromRow)]
struct LoanPublicationRow {
    loan_id: i64,
    #[sqlx(flatten)]
    publication: PublicationRow,
}

/// PostgreSQL repository for loans and their publication links.
///
/// Copy counts change through relative, guarded updates inside the same
/// transaction as the loan row, so two loans racing for the last copy cannot
/// both succeed.
pub struct PgLoanRepository {
    pool: Arc<PgPool>,
}

impl PgLoanRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

/// Loads the publications of `loan_ids`, grouped by loan in insertion order.
async fn load_publications(
    conn: &mut PgConnection,
    loan_ids: &[i64],
) -> Result<HashMap<i64, Vec<Publication>>, AppError> {
    let rows: Vec<LoanPublicationRow> = sqlx::query_as(&format!(
        r#"
        SELECT lp.loan_id, {PUBLICATION_COLUMNS}
        FROM loan_publications lp
        JOIN publications p ON p.id = lp.publication_id
        WHERE lp.loan_id = ANY($1)
        ORDER BY lp.loan_id, lp.position
        "#
    ))
    .bind(loan_ids)
    .fetch_all(&mut *conn)
    .await?;

    let mut grouped: HashMap<i64, Vec<Publication>> = HashMap::new();
    for row in rows {
        grouped
            .entry(row.loan_id)
            .or_default()
            .push(Publication::try_from(row.publication)?);
    }
    Ok(grouped)
}

fn assemble(rows: Vec<LoanRow>, mut publications: HashMap<i64, Vec<Publication>>) -> Vec<Loan> {
    rows.into_iter()
        .map(|row| {
            Loan::restore(
                row.id,
                row.user_id,
                publications.remove(&row.id).unwrap_or_default(),
                row.start_date,
                row.end_date,
                row.return_date,
                row.price,
            )
        })
        .collect()
}

const LOAN_COLUMNS: &str = "id, user_id, start_date, end_date, return_date, price";

#[async_trait]
impl LoanRepository for PgLoanRepository {
    async fn create(&self, loan: Loan) -> Result<Loan, AppError> {
        let publication_ids = loan.publication_ids();
        let mut tx = self.pool.begin().await?;

        for pid in &publication_ids {
            let taken: Option<i64> = sqlx::query_scalar(
                r#"
                UPDATE publications
                SET available_copies = available_copies - 1
                WHERE id = $1 AND available_copies > 0
                RETURNING id
                "#,
            )
            .bind(pid)
            .fetch_optional(&mut *tx)
            .await?;

            if taken.is_none() {
                debug!(publication_id = pid, "No copy left, rolling back loan");
                return Err(OrchestrationError::CopiesExhausted(*pid).into());
            }
        }

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO loans (user_id, start_date, end_date, return_date, price)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(loan.user_id())
        .bind(loan.start_date())
        .bind(loan.end_date())
        .bind(loan.return_date())
        .bind(loan.price())
        .fetch_one(&mut *tx)
        .await?;

        for (position, pid) in publication_ids.iter().enumerate() {
            sqlx::query(
                "INSERT INTO loan_publications (loan_id, publication_id, position) VALUES ($1, $2, $3)",
            )
            .bind(id)
            .bind(pid)
            .bind(position as i32)
            .execute(&mut *tx)
            .await?;
        }

        let mut publications = load_publications(&mut *tx, &[id]).await?;
        tx.commit().await?;

        Ok(Loan::restore(
            id,
            loan.user_id(),
            publications.remove(&id).unwrap_or_default(),
            loan.start_date(),
            loan.end_date(),
            loan.return_date(),
            loan.price(),
        ))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Loan>, AppError> {
        let mut conn = self.pool.acquire().await?;

        let row: Option<LoanRow> =
            sqlx::query_as(&format!("SELECT {LOAN_COLUMNS} FROM loans WHERE id = $1"))
                .bind(id)
                .fetch_optional(&mut *conn)
                .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let publications = load_publications(&mut *conn, &[id]).await?;

        Ok(assemble(vec![row], publications).pop())
    }

    async fn find_by_user(&self, user_id: i64, only_active: bool) -> Result<Vec<Loan>, AppError> {
        let mut conn = self.pool.acquire().await?;

        let rows: Vec<LoanRow> = sqlx::query_as(&format!(
            r#"
            SELECT {LOAN_COLUMNS}
            FROM loans
            WHERE user_id = $1 AND (NOT $2 OR return_date IS NULL)
            ORDER BY start_date DESC, id DESC
            "#
        ))
        .bind(user_id)
        .bind(only_active)
        .fetch_all(&mut *conn)
        .await?;

        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        let publications = load_publications(&mut *conn, &ids).await?;

        Ok(assemble(rows, publications))
    }

    async fn mark_returned(
        &self,
        loan: &Loan,
        charge: ReturnCharge,
    ) -> Result<SettledReturn, AppError> {
        let id = loan
            .id()
            .ok_or_else(|| AppError::internal("Loan has no id", json!({})))?;
        let mut tx = self.pool.begin().await?;

        // Claim the loan first; a concurrent return of the same loan waits on
        // this row lock and then matches nothing.
        let result = sqlx::query(
            "UPDATE loans SET return_date = $2 WHERE id = $1 AND return_date IS NULL",
        )
        .bind(id)
        .bind(loan.return_date())
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM loans WHERE id = $1)")
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;
            return Err(if exists {
                AppError::conflict(
                    "Loan already returned",
                    json!({ "kind": "AlreadyReturned", "loan_id": id }),
                )
            } else {
                OrchestrationError::LoanNotFound(id).into()
            });
        }

        sqlx::query(
            r#"
            UPDATE publications
            SET available_copies = available_copies + 1
            WHERE id IN (SELECT publication_id FROM loan_publications WHERE loan_id = $1)
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        let settled = match charge {
            ReturnCharge::Price(price) => SettledReturn {
                price,
                free_loan_redeemed: false,
            },
            ReturnCharge::FreeLoan {
                membership_id,
                fallback_price,
            } => {
                let redeemed: Option<i64> = sqlx::query_scalar(
                    r#"
                    UPDATE memberships
                    SET free_loans = free_loans - 1
                    WHERE id = $1 AND free_loans > 0
                    RETURNING id
                    "#,
                )
                .bind(membership_id)
                .fetch_optional(&mut *tx)
                .await?;

                if redeemed.is_none() {
                    debug!(loan_id = id, membership_id, "No free loan left at return");
                }
                SettledReturn {
                    price: if redeemed.is_some() { 0 } else { fallback_price },
                    free_loan_redeemed: redeemed.is_some(),
                }
            }
        };

        sqlx::query("UPDATE loans SET price = $2 WHERE id = $1")
            .bind(id)
            .bind(settled.price)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(settled)
    }

    async fn delete_by_user(&self, user_id: i64) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM loans WHERE user_id = $1")
            .bind(user_id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected())
    }

    async fn count(&self, only_active: bool) -> Result<i64, AppError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM loans WHERE NOT $1 OR return_date IS NULL")
                .bind(only_active)
                .fetch_one(self.pool.as_ref())
                .await?;

        Ok(count)
    }
}
