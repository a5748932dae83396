//! Shared in-process state behind the in-memory repositories.

use chrono::NaiveDate;
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use crate::domain::entities::{Membership, Publication, User};
use crate::error::AppError;

/// Stored form of a loan: publications are kept by id and resolved on read.
#[derive(Debug, Clone)]
pub(super) struct LoanRecord {
    pub user_id: i64,
    pub publication_ids: Vec<i64>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub price: i64,
}

#[derive(Debug, Default)]
pub(super) struct Tables {
    next_id: i64,
    pub users: BTreeMap<i64, User>,
    pub publications: BTreeMap<i64, Publication>,
    pub memberships: BTreeMap<i64, Membership>,
    pub loans: BTreeMap<i64, LoanRecord>,
}

impl Tables {
    pub fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-process store used when no database is configured.
///
/// Every repository operation runs under one lock, which gives each loan
/// registration or return the same all-or-nothing behaviour as a database
/// transaction.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub(super) fn lock(&self) -> Result<MutexGuard<'_, Tables>, AppError> {
        self.tables
            .lock()
            .map_err(|_| AppError::internal("Memory store lock poisoned", json!({})))
    }
}
