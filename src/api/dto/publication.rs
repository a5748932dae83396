//! DTOs for publication endpoints.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::{Publication, PublicationKind};

/// Request body for `POST /api/publications/books`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBookRequest {
    #[validate(length(max = 500))]
    pub title: String,

    #[validate(length(max = 200))]
    pub author: String,

    #[validate(length(max = 32))]
    pub isbn: String,

    pub publication_year: i32,
    pub available_copies: i32,
}

/// Request body for `POST /api/publications/magazines`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateMagazineRequest {
    #[validate(length(max = 500))]
    pub title: String,

    #[validate(length(max = 200))]
    pub editor: String,

    #[validate(length(max = 32))]
    pub issn: String,

    pub publication_year: i32,
    pub available_copies: i32,
}

/// JSON representation of a book or magazine.
///
/// Variant fields that do not apply to `kind` are omitted.
#[derive(Debug, Serialize)]
pub struct PublicationResponse {
    pub id: Option<i64>,
    pub kind: &'static str,
    pub title: String,
    pub publication_year: i32,
    pub available_copies: i32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub editor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issn: Option<String>,
}

impl From<&Publication> for PublicationResponse {
    fn from(publication: &Publication) -> Self {
        let mut response = Self {
            id: publication.id(),
            kind: publication.kind().tag(),
            title: publication.title().to_string(),
            publication_year: publication.publication_year(),
            available_copies: publication.available_copies(),
            author: None,
            isbn: None,
            editor: None,
            issn: None,
        };

        match publication.kind() {
            PublicationKind::Book { author, isbn } => {
                response.author = Some(author.clone());
                response.isbn = Some(isbn.clone());
            }
            PublicationKind::Magazine { editor, issn } => {
                response.editor = Some(editor.clone());
                response.issn = Some(issn.clone());
            }
        }

        response
    }
}
