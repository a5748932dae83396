//! In-memory loan repository.

use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

use super::store::{LoanRecord, MemoryStore, Tables};
use crate::domain::entities::Loan;
use crate::domain::errors::OrchestrationError;
use crate::domain::repositories::{LoanRepository, ReturnCharge, SettledReturn};
use crate::error::AppError;

pub struct InMemoryLoanRepository {
    store: Arc<MemoryStore>,
}

impl InMemoryLoanRepository {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

fn hydrate(tables: &Tables, id: i64, record: &LoanRecord) -> Loan {
    let publications = record
        .publication_ids
        .iter()
        .filter_map(|pid| tables.publications.get(pid).cloned())
        .collect();

    Loan::restore(
        id,
        record.user_id,
        publications,
        record.start_date,
        record.end_date,
        record.return_date,
        record.price,
    )
}

#[async_trait]
impl LoanRepository for InMemoryLoanRepository {
    async fn create(&self, loan: Loan) -> Result<Loan, AppError> {
        let mut tables = self.store.lock()?;
        let publication_ids = loan.publication_ids();

        for pid in &publication_ids {
            match tables.publications.get(pid) {
                Some(p) if p.available_copies() > 0 => {}
                Some(_) => return Err(OrchestrationError::CopiesExhausted(*pid).into()),
                None => {
                    return Err(OrchestrationError::PublicationNotFound(vec![*pid]).into());
                }
            }
        }
        for pid in &publication_ids {
            if let Some(p) = tables.publications.get_mut(pid) {
                p.lend_one_copy()?;
            }
        }

        let id = tables.next_id();
        let record = LoanRecord {
            user_id: loan.user_id(),
            publication_ids,
            start_date: loan.start_date(),
            end_date: loan.end_date(),
            return_date: loan.return_date(),
            price: loan.price(),
        };
        let stored = hydrate(&tables, id, &record);
        tables.loans.insert(id, record);

        Ok(stored)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Loan>, AppError> {
        let tables = self.store.lock()?;
        Ok(tables
            .loans
            .get(&id)
            .map(|record| hydrate(&tables, id, record)))
    }

    async fn find_by_user(&self, user_id: i64, only_active: bool) -> Result<Vec<Loan>, AppError> {
        let tables = self.store.lock()?;
        let mut loans: Vec<Loan> = tables
            .loans
            .iter()
            .filter(|(_, r)| r.user_id == user_id)
            .filter(|(_, r)| !only_active || r.return_date.is_none())
            .map(|(id, r)| hydrate(&tables, *id, r))
            .collect();
        loans.sort_by(|a, b| {
            b.start_date()
                .cmp(&a.start_date())
                .then_with(|| b.id().cmp(&a.id()))
        });
        Ok(loans)
    }

    async fn mark_returned(
        &self,
        loan: &Loan,
        charge: ReturnCharge,
    ) -> Result<SettledReturn, AppError> {
        let id = loan
            .id()
            .ok_or_else(|| AppError::internal("Loan has no id", json!({})))?;
        let mut guard = self.store.lock()?;
        let tables = &mut *guard;

        let record = tables
            .loans
            .get_mut(&id)
            .ok_or(OrchestrationError::LoanNotFound(id))?;
        if record.return_date.is_some() {
            return Err(AppError::conflict(
                "Loan already returned",
                json!({ "kind": "AlreadyReturned", "loan_id": id }),
            ));
        }

        let settled = match charge {
            ReturnCharge::Price(price) => SettledReturn {
                price,
                free_loan_redeemed: false,
            },
            ReturnCharge::FreeLoan {
                membership_id,
                fallback_price,
            } => {
                let redeemed = tables
                    .memberships
                    .get_mut(&membership_id)
                    .is_some_and(|m| m.redeem_free_loan().is_ok());
                SettledReturn {
                    price: if redeemed { 0 } else { fallback_price },
                    free_loan_redeemed: redeemed,
                }
            }
        };

        record.return_date = loan.return_date();
        record.price = settled.price;
        for pid in &record.publication_ids {
            if let Some(p) = tables.publications.get_mut(pid) {
                p.return_one_copy();
            }
        }

        Ok(settled)
    }

    async fn delete_by_user(&self, user_id: i64) -> Result<u64, AppError> {
        let mut tables = self.store.lock()?;
        let before = tables.loans.len();
        tables.loans.retain(|_, r| r.user_id != user_id);
        Ok((before - tables.loans.len()) as u64)
    }

    async fn count(&self, only_active: bool) -> Result<i64, AppError> {
        let tables = self.store.lock()?;
        Ok(tables
            .loans
            .values()
            .filter(|r| !only_active || r.return_date.is_none())
            .count() as i64)
    }
}
