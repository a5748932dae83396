#![allow(dead_code)]

use axum::{Router, routing::get};
use axum_test::TestServer;
use chrono::NaiveDate;
use library_lending::api::handlers::health_handler;
use library_lending::api::routes::api_routes;
use library_lending::domain::clock::AdjustableClock;
use library_lending::state::AppState;
use serde_json::{Value, json};
use std::sync::Arc;

pub const DUNE_ISBN: &str = "9780441172719";

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Test server over a fresh in-memory store with the clock pinned to 2024-03-01.
pub fn create_test_server() -> (TestServer, Arc<AdjustableClock>) {
    let clock = Arc::new(AdjustableClock::new());
    clock.set_today(date(2024, 3, 1));

    let state = AppState::in_memory(clock.clone());
    let app = Router::new()
        .nest("/api", api_routes().route("/health", get(health_handler)))
        .with_state(state);

    (TestServer::new(app).unwrap(), clock)
}

pub async fn create_user(server: &TestServer, email: &str) -> Value {
    let response = server
        .post("/api/users")
        .json(&json!({
            "name": "Ada Lovelace",
            "age": 36,
            "email": email,
            "password": "analytical-engine"
        }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    response.json::<Value>()
}

pub async fn create_book(server: &TestServer, title: &str, copies: i32) -> i64 {
    let response = server
        .post("/api/publications/books")
        .json(&json!({
            "title": title,
            "author": "Frank Herbert",
            "isbn": DUNE_ISBN,
            "publication_year": 1965,
            "available_copies": copies
        }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    response.json::<Value>()["id"].as_i64().unwrap()
}

pub async fn create_membership(
    server: &TestServer,
    email: &str,
    membership_type: &str,
    free_loans: i32,
) -> Value {
    let response = server
        .post("/api/memberships")
        .json(&json!({
            "email": email,
            "start_date": "2024-03-01",
            "membership_type": membership_type,
            "free_loans": free_loans
        }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    response.json::<Value>()
}

pub async fn create_loan(server: &TestServer, email: &str, start: &str, ids: &[i64]) -> i64 {
    let response = server
        .post("/api/loans")
        .json(&json!({
            "email": email,
            "start_date": start,
            "publication_ids": ids
        }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    response.json::<Value>()["id"].as_i64().unwrap()
}

pub async fn available_copies(server: &TestServer, id: i64) -> i64 {
    server
        .get(&format!("/api/publications/{id}"))
        .await
        .json::<Value>()["available_copies"]
        .as_i64()
        .unwrap()
}

/// Asserts the error body and returns its `details.kind`.
pub fn error_kind(body: &Value) -> String {
    assert!(body["error"]["code"].is_string(), "not an error body: {body}");
    body["error"]["details"]["kind"]
        .as_str()
        .unwrap_or_default()
        .to_string()
}
