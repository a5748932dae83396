//! API route configuration.

use crate::api::handlers::{
    active_membership_handler, create_book_handler, create_loan_handler,
    create_magazine_handler, create_membership_handler, create_user_handler,
    delete_user_loans_handler, get_publication_handler, get_user_handler,
    list_publications_handler, list_user_loans_handler, return_loan_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// All API routes, mounted under `/api`.
///
/// # Endpoints
///
/// - `POST   /users`                      - Register a user
/// - `GET    /users/{email}`              - Look up a user
/// - `GET    /users/{email}/membership`   - Membership active today
/// - `GET    /users/{email}/loans`        - Loans of a user (`?active=true`)
/// - `DELETE /users/{email}/loans`        - Delete a fully returned loan history
/// - `GET    /publications`               - List the catalogue
/// - `GET    /publications/{id}`          - Get one publication
/// - `POST   /publications/books`         - Add a book
/// - `POST   /publications/magazines`     - Add a magazine
/// - `POST   /memberships`                - Subscribe to a tier
/// - `POST   /loans`                      - Register a loan
/// - `POST   /loans/{id}/return`          - Return a loan
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(create_user_handler))
        .route("/users/{email}", get(get_user_handler))
        .route("/users/{email}/membership", get(active_membership_handler))
        .route(
            "/users/{email}/loans",
            get(list_user_loans_handler).delete(delete_user_loans_handler),
        )
        .route("/publications", get(list_publications_handler))
        .route("/publications/{id}", get(get_publication_handler))
        .route("/publications/books", post(create_book_handler))
        .route("/publications/magazines", post(create_magazine_handler))
        .route("/memberships", post(create_membership_handler))
        .route("/loans", post(create_loan_handler))
        .route("/loans/{id}/return", post(return_loan_handler))
}
