//! Handlers for the publication catalogue.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::publication::{
    CreateBookRequest, CreateMagazineRequest, PublicationResponse,
};
use crate::error::AppError;
use crate::state::AppState;

/// Adds a book to the catalogue.
///
/// # Endpoint
///
/// `POST /api/publications/books`
///
/// # Request Body
///
/// ```json
/// {
///   "title": "Dune",
///   "author": "Frank Herbert",
///   "isbn": "9780441172719",
///   "publication_year": 1965,
///   "available_copies": 3
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request for a blank title or author, an ISBN with fewer
/// than 13 digits, a year outside `1..=current year`, or negative copies.
pub async fn create_book_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateBookRequest>,
) -> Result<(StatusCode, Json<PublicationResponse>), AppError> {
    payload.validate()?;

    let book = state
        .publication_service
        .create_book(
            payload.title,
            payload.author,
            payload.isbn,
            payload.publication_year,
            payload.available_copies,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(PublicationResponse::from(&book))))
}

/// Adds a magazine to the catalogue.
///
/// # Endpoint
///
/// `POST /api/publications/magazines`
///
/// # Errors
///
/// Returns 400 Bad Request for a blank title, editor or ISSN, a year outside
/// `1..=current year`, or negative copies.
pub async fn create_magazine_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateMagazineRequest>,
) -> Result<(StatusCode, Json<PublicationResponse>), AppError> {
    payload.validate()?;

    let magazine = state
        .publication_service
        .create_magazine(
            payload.title,
            payload.editor,
            payload.issn,
            payload.publication_year,
            payload.available_copies,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(PublicationResponse::from(&magazine))))
}

/// Lists the whole catalogue with current stock.
///
/// # Endpoint
///
/// `GET /api/publications`
pub async fn list_publications_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<PublicationResponse>>, AppError> {
    let publications = state.publication_service.list_publications().await?;

    Ok(Json(
        publications.iter().map(PublicationResponse::from).collect(),
    ))
}

/// Retrieves a single publication.
///
/// # Endpoint
///
/// `GET /api/publications/{id}`
///
/// # Errors
///
/// Returns 404 Not Found if the publication does not exist.
pub async fn get_publication_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<PublicationResponse>, AppError> {
    let publication = state.publication_service.get_publication(id).await?;

    Ok(Json(PublicationResponse::from(&publication)))
}
