mod common;

use axum::http::StatusCode;
use serde_json::{Value, json};

const ADA: &str = "ada@example.com";

#[tokio::test]
async fn test_register_loan_takes_one_copy_each() {
    let (server, _clock) = common::create_test_server();
    common::create_user(&server, ADA).await;
    let dune = common::create_book(&server, "Dune", 2).await;
    let messiah = common::create_book(&server, "Dune Messiah", 1).await;

    let response = server
        .post("/api/loans")
        .json(&json!({
            "email": ADA,
            "start_date": "2024-02-15",
            "publication_ids": [messiah, dune]
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body = response.json::<Value>();
    assert_eq!(body["status"], "active");
    assert_eq!(body["end_date"], "2024-03-16");
    assert_eq!(body["price"], 0);
    assert_eq!(body["publications"][0]["id"], messiah);
    assert_eq!(body["publications"][1]["id"], dune);

    assert_eq!(common::available_copies(&server, dune).await, 1);
    assert_eq!(common::available_copies(&server, messiah).await, 0);
}

#[tokio::test]
async fn test_start_date_defaults_to_today() {
    let (server, _clock) = common::create_test_server();
    common::create_user(&server, ADA).await;
    let dune = common::create_book(&server, "Dune", 1).await;

    let response = server
        .post("/api/loans")
        .json(&json!({ "email": ADA, "publication_ids": [dune] }))
        .await;

    response.assert_status(StatusCode::CREATED);
    assert_eq!(response.json::<Value>()["start_date"], "2024-03-01");
}

#[tokio::test]
async fn test_loan_without_copies_is_rejected() {
    let (server, _clock) = common::create_test_server();
    common::create_user(&server, ADA).await;
    let dune = common::create_book(&server, "Dune", 1).await;
    let empty = common::create_book(&server, "Out of Print", 0).await;

    let response = server
        .post("/api/loans")
        .json(&json!({ "email": ADA, "publication_ids": [dune, empty] }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        common::error_kind(&response.json::<Value>()),
        "NoAvailableCopies"
    );
    assert_eq!(common::available_copies(&server, dune).await, 1);
}

#[tokio::test]
async fn test_loan_rejections() {
    let (server, _clock) = common::create_test_server();
    common::create_user(&server, ADA).await;
    let dune = common::create_book(&server, "Dune", 3).await;

    let cases = [
        (json!({ "email": ADA, "publication_ids": [] }), StatusCode::BAD_REQUEST, "InvalidPublications"),
        (json!({ "email": ADA, "publication_ids": [dune, dune] }), StatusCode::BAD_REQUEST, "InvalidPublications"),
        (json!({ "email": ADA, "start_date": "2024-03-02", "publication_ids": [dune] }), StatusCode::BAD_REQUEST, "FutureStartDate"),
        (json!({ "email": ADA, "publication_ids": [dune, 999] }), StatusCode::NOT_FOUND, "PublicationNotFound"),
        (json!({ "email": "ghost@example.com", "publication_ids": [dune] }), StatusCode::NOT_FOUND, "UserNotFound"),
    ];

    for (payload, status, kind) in cases {
        let response = server.post("/api/loans").json(&payload).await;
        response.assert_status(status);
        assert_eq!(common::error_kind(&response.json::<Value>()), kind);
    }

    assert_eq!(common::available_copies(&server, dune).await, 3);
}

#[tokio::test]
async fn test_late_return_without_membership() {
    let (server, _clock) = common::create_test_server();
    common::create_user(&server, ADA).await;
    let dune = common::create_book(&server, "Dune", 1).await;
    let loan_id = common::create_loan(&server, ADA, "2024-01-01", &[dune]).await;

    let response = server
        .post(&format!("/api/loans/{loan_id}/return"))
        .json(&json!({ "return_date": "2024-02-10" }))
        .await;

    response.assert_status_ok();
    let receipt = response.json::<Value>();
    assert_eq!(receipt["price"], 40);
    assert_eq!(receipt["late_days"], 10);
    assert_eq!(receipt["fine"], 5);
    assert_eq!(receipt["total"], 45);
    assert_eq!(receipt["free_loan_redeemed"], false);
    assert_eq!(common::available_copies(&server, dune).await, 1);
}

#[tokio::test]
async fn test_return_redeems_free_loan() {
    let (server, _clock) = common::create_test_server();
    common::create_user(&server, ADA).await;
    common::create_membership(&server, ADA, "BRONZE", 2).await;
    let dune = common::create_book(&server, "Dune", 1).await;
    let loan_id = common::create_loan(&server, ADA, "2024-02-20", &[dune]).await;

    let response = server.post(&format!("/api/loans/{loan_id}/return")).await;

    response.assert_status_ok();
    let receipt = response.json::<Value>();
    assert_eq!(receipt["price"], 0);
    assert_eq!(receipt["free_loan_redeemed"], true);

    let membership = server
        .get(&format!("/api/users/{ADA}/membership"))
        .await
        .json::<Value>();
    assert_eq!(membership["free_loans"], 1);
}

#[tokio::test]
async fn test_return_applies_tier_discount_without_free_loans() {
    let (server, _clock) = common::create_test_server();
    common::create_user(&server, ADA).await;
    common::create_membership(&server, ADA, "BRONZE", 0).await;
    let dune = common::create_book(&server, "Dune", 1).await;
    let loan_id = common::create_loan(&server, ADA, "2024-02-01", &[dune]).await;

    let response = server
        .post(&format!("/api/loans/{loan_id}/return"))
        .json(&json!({ "return_date": "2024-03-01" }))
        .await;

    response.assert_status_ok();
    let receipt = response.json::<Value>();
    // 29 days at 0.75 rounds down
    assert_eq!(receipt["price"], 21);
    assert_eq!(receipt["fine"], 0);
    assert_eq!(receipt["free_loan_redeemed"], false);
}

#[tokio::test]
async fn test_return_date_rules() {
    let (server, _clock) = common::create_test_server();
    common::create_user(&server, ADA).await;
    let dune = common::create_book(&server, "Dune", 1).await;
    let loan_id = common::create_loan(&server, ADA, "2024-02-01", &[dune]).await;
    let path = format!("/api/loans/{loan_id}/return");

    let cases = [
        (json!({ "return_date": "2024-01-31" }), "ReturnDateBeforeStartDate"),
        (json!({ "return_date": "2024-03-02" }), "FutureReturnDate"),
        (json!({ "return_date": "01/03/2024" }), "InvalidReturnDate"),
        (json!({ "return_date": "2024-02-30" }), "InvalidReturnDate"),
    ];

    for (payload, kind) in cases {
        let response = server.post(&path).json(&payload).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(common::error_kind(&response.json::<Value>()), kind);
    }

    // none of the rejected attempts closed the loan
    server.post(&path).await.assert_status_ok();
}

#[tokio::test]
async fn test_second_return_is_rejected() {
    let (server, _clock) = common::create_test_server();
    common::create_user(&server, ADA).await;
    let dune = common::create_book(&server, "Dune", 1).await;
    let loan_id = common::create_loan(&server, ADA, "2024-02-01", &[dune]).await;
    let path = format!("/api/loans/{loan_id}/return");

    server.post(&path).await.assert_status_ok();
    let response = server.post(&path).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        common::error_kind(&response.json::<Value>()),
        "AlreadyReturned"
    );
    assert_eq!(common::available_copies(&server, dune).await, 1);
}

#[tokio::test]
async fn test_return_unknown_loan_is_not_found() {
    let (server, _clock) = common::create_test_server();

    let response = server.post("/api/loans/42/return").await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(common::error_kind(&response.json::<Value>()), "LoanNotFound");
}

#[tokio::test]
async fn test_list_loans_with_active_filter() {
    let (server, _clock) = common::create_test_server();
    common::create_user(&server, ADA).await;
    let dune = common::create_book(&server, "Dune", 2).await;
    let first = common::create_loan(&server, ADA, "2024-02-01", &[dune]).await;
    let second = common::create_loan(&server, ADA, "2024-02-10", &[dune]).await;
    server
        .post(&format!("/api/loans/{first}/return"))
        .await
        .assert_status_ok();

    let all = server
        .get(&format!("/api/users/{ADA}/loans"))
        .await
        .json::<Value>();
    let all = all.as_array().unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0]["id"], second);
    assert_eq!(all[1]["status"], "returned");

    let active = server
        .get(&format!("/api/users/{ADA}/loans"))
        .add_query_param("active", "true")
        .await
        .json::<Value>();
    let active = active.as_array().unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0]["id"], second);
}

#[tokio::test]
async fn test_delete_loans_requires_returned_history() {
    let (server, _clock) = common::create_test_server();
    common::create_user(&server, ADA).await;
    let dune = common::create_book(&server, "Dune", 2).await;
    let path = format!("/api/users/{ADA}/loans");

    let response = server.delete(&path).await;
    response.assert_status(StatusCode::CONFLICT);
    assert_eq!(common::error_kind(&response.json::<Value>()), "UserHasNoLoans");

    let first = common::create_loan(&server, ADA, "2024-02-01", &[dune]).await;
    let second = common::create_loan(&server, ADA, "2024-02-10", &[dune]).await;
    server
        .post(&format!("/api/loans/{first}/return"))
        .await
        .assert_status_ok();

    let response = server.delete(&path).await;
    response.assert_status(StatusCode::CONFLICT);
    assert_eq!(
        common::error_kind(&response.json::<Value>()),
        "UserHasActiveLoans"
    );

    server
        .post(&format!("/api/loans/{second}/return"))
        .await
        .assert_status_ok();

    let response = server.delete(&path).await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["deleted"], 2);

    let remaining = server.get(&path).await.json::<Value>();
    assert!(remaining.as_array().unwrap().is_empty());
}
