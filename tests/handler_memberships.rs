mod common;

use axum::http::StatusCode;
use serde_json::{Value, json};

#[tokio::test]
async fn test_membership_defaults_to_one_year() {
    let (server, _clock) = common::create_test_server();
    common::create_user(&server, "ada@example.com").await;

    let body = common::create_membership(&server, "ada@example.com", "gold", 12).await;

    assert_eq!(body["membership_type"], "GOLD");
    assert_eq!(body["start_date"], "2024-03-01");
    assert_eq!(body["end_date"], "2025-03-01");
    assert_eq!(body["free_loans"], 12);
}

#[tokio::test]
async fn test_active_membership_lookup() {
    let (server, _clock) = common::create_test_server();
    common::create_user(&server, "ada@example.com").await;
    common::create_membership(&server, "ada@example.com", "SILVER", 8).await;

    let response = server.get("/api/users/ada@example.com/membership").await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["membership_type"], "SILVER");
}

#[tokio::test]
async fn test_missing_active_membership_is_not_found() {
    let (server, _clock) = common::create_test_server();
    common::create_user(&server, "ada@example.com").await;

    let response = server.get("/api/users/ada@example.com/membership").await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(
        common::error_kind(&response.json::<Value>()),
        "NoActiveMembership"
    );
}

#[tokio::test]
async fn test_membership_expires_after_end_date() {
    let (server, clock) = common::create_test_server();
    common::create_user(&server, "ada@example.com").await;
    common::create_membership(&server, "ada@example.com", "BRONZE", 2).await;

    clock.set_today(common::date(2025, 3, 1));
    let response = server.get("/api/users/ada@example.com/membership").await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_membership_rules() {
    let (server, _clock) = common::create_test_server();
    common::create_user(&server, "ada@example.com").await;

    let cases = [
        (json!({ "email": "ada@example.com", "start_date": "2024-02-28", "membership_type": "GOLD", "free_loans": 12 }), "StartDateInPast"),
        (json!({ "email": "ada@example.com", "start_date": "2024-03-01", "membership_type": "BRONZE", "free_loans": 6 }), "InvalidFreeLoans"),
        (json!({ "email": "ada@example.com", "start_date": "2024-03-01", "membership_type": "GOLD", "free_loans": 10 }), "InvalidFreeLoans"),
        (json!({ "email": "ada@example.com", "start_date": "2024-03-01", "membership_type": "PLATINUM", "free_loans": 1 }), "InvalidMembershipType"),
        (json!({ "email": "ada@example.com", "start_date": "2024-03-01", "end_date": "2024-09-01", "membership_type": "GOLD", "free_loans": 12 }), "EndDateMismatch"),
    ];

    for (payload, kind) in cases {
        let response = server.post("/api/memberships").json(&payload).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(common::error_kind(&response.json::<Value>()), kind);
    }
}

#[tokio::test]
async fn test_overlapping_membership_conflicts() {
    let (server, _clock) = common::create_test_server();
    common::create_user(&server, "ada@example.com").await;
    common::create_membership(&server, "ada@example.com", "BRONZE", 3).await;

    let response = server
        .post("/api/memberships")
        .json(&json!({
            "email": "ada@example.com",
            "start_date": "2024-06-01",
            "membership_type": "GOLD",
            "free_loans": 11
        }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    assert_eq!(
        common::error_kind(&response.json::<Value>()),
        "OverlappingMembership"
    );
}

#[tokio::test]
async fn test_membership_windows_overlap_on_shared_end_day() {
    let (server, _clock) = common::create_test_server();
    common::create_user(&server, "ada@example.com").await;
    common::create_membership(&server, "ada@example.com", "BRONZE", 3).await;

    let shared_day = server
        .post("/api/memberships")
        .json(&json!({
            "email": "ada@example.com",
            "start_date": "2025-03-01",
            "membership_type": "GOLD",
            "free_loans": 11
        }))
        .await;
    shared_day.assert_status(StatusCode::CONFLICT);

    let next_day = server
        .post("/api/memberships")
        .json(&json!({
            "email": "ada@example.com",
            "start_date": "2025-03-02",
            "membership_type": "GOLD",
            "free_loans": 11
        }))
        .await;
    next_day.assert_status(StatusCode::CREATED);
}

#[tokio::test]
async fn test_membership_for_unknown_user_is_not_found() {
    let (server, _clock) = common::create_test_server();

    let response = server
        .post("/api/memberships")
        .json(&json!({
            "email": "ghost@example.com",
            "start_date": "2024-03-01",
            "membership_type": "GOLD",
            "free_loans": 11
        }))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}
