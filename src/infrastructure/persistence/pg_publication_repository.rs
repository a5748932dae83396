//! PostgreSQL implementation of publication repository.

use async_trait::async_trait;
use serde_json::json;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::entities::{Publication, PublicationKind};
use crate::domain::repositories::PublicationRepository;
use crate::error::AppError;

/// Column list matching [`PublicationRow`], for queries joining other tables.
pub(super) const PUBLICATION_COLUMNS: &str =
    "p.id, p.kind, p.title, p.publication_year, p.available_copies, \
     p.author, p.isbn, p.editor, p.issn";

/// One `publications` row. Variant columns are nullable and selected by `kind`.
#[derive(Debug, sqlx::FromRow)]
pub(super) struct PublicationRow {
    pub id: i64,
    pub kind: String,
    pub title: String,
    pub publication_year: i32,
    pub available_copies: i32,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub editor: Option<String>,
    pub issn: Option<String>,
}

impl TryFrom<PublicationRow> for Publication {
    type Error = AppError;

    fn try_from(row: PublicationRow) -> Result<Self, Self::Error> {
        let kind = match (row.kind.as_str(), row.author, row.isbn, row.editor, row.issn) {
            ("book", Some(author), Some(isbn), _, _) => PublicationKind::Book { author, isbn },
            ("magazine", _, _, Some(editor), Some(issn)) => {
                PublicationKind::Magazine { editor, issn }
            }
            (kind, ..) => {
                return Err(AppError::internal(
                    "Malformed publication row",
                    json!({ "id": row.id, "kind": kind }),
                ));
            }
        };

        Ok(Publication::restore(
            row.id,
            row.title,
            row.publication_year,
            row.available_copies,
            kind,
        ))
    }
}

/// PostgreSQL repository for books and magazines.
pub struct PgPublicationRepository {
    pool: Arc<PgPool>,
}

impl PgPublicationRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PublicationRepository for PgPublicationRepository {
    async fn create(&self, publication: Publication) -> Result<Publication, AppError> {
        let (author, isbn, editor, issn) = match publication.kind() {
            PublicationKind::Book { author, isbn } => {
                (Some(author.as_str()), Some(isbn.as_str()), None, None)
            }
            PublicationKind::Magazine { editor, issn } => {
                (None, None, Some(editor.as_str()), Some(issn.as_str()))
            }
        };

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO publications
                (kind, title, publication_year, available_copies, author, isbn, editor, issn)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            "#,
        )
        .bind(publication.kind().tag())
        .bind(publication.title())
        .bind(publication.publication_year())
        .bind(publication.available_copies())
        .bind(author)
        .bind(isbn)
        .bind(editor)
        .bind(issn)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(publication.with_id(id))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Publication>, AppError> {
        let row: Option<PublicationRow> = sqlx::query_as(&format!(
            "SELECT {PUBLICATION_COLUMNS} FROM publications p WHERE p.id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(Publication::try_from).transpose()
    }

    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<Publication>, AppError> {
        let rows: Vec<PublicationRow> = sqlx::query_as(&format!(
            "SELECT {PUBLICATION_COLUMNS} FROM publications p WHERE p.id = ANY($1)"
        ))
        .bind(ids)
        .fetch_all(self.pool.as_ref())
        .await?;

        let mut by_id: HashMap<i64, Publication> = HashMap::with_capacity(rows.len());
        for row in rows {
            let publication = Publication::try_from(row)?;
            if let Some(id) = publication.id() {
                by_id.insert(id, publication);
            }
        }

        Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }

    async fn list(&self) -> Result<Vec<Publication>, AppError> {
        let rows: Vec<PublicationRow> = sqlx::query_as(&format!(
            "SELECT {PUBLICATION_COLUMNS} FROM publications p ORDER BY p.id"
        ))
        .fetch_all(self.pool.as_ref())
        .await?;

        rows.into_iter().map(Publication::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(kind: &str) -> PublicationRow {
        PublicationRow {
            id: 7,
            kind: kind.to_string(),
            title: "Dune".to_string(),
            publication_year: 1965,
            available_copies: 2,
            author: Some("Frank Herbert".to_string()),
            isbn: Some("9780441172719".to_string()),
            editor: None,
            issn: None,
        }
    }

    #[test]
    fn test_book_row_converts() {
        let publication = Publication::try_from(row("book")).unwrap();

        assert_eq!(publication.id(), Some(7));
        assert_eq!(publication.kind().tag(), "book");
        assert_eq!(publication.available_copies(), 2);
    }

    #[test]
    fn test_magazine_row_without_editor_is_rejected() {
        let err = Publication::try_from(row("magazine")).unwrap_err();

        assert!(matches!(err, AppError::Internal { .. }));
    }
}
