//! Publication entity with copy-availability bookkeeping.

use crate::domain::clock::Clock;
use crate::domain::errors::ValidationError;

/// Minimum number of digit characters an ISBN must carry.
const ISBN_MIN_DIGITS: usize = 13;

/// Variant-specific payload of a publication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublicationKind {
    Book { author: String, isbn: String },
    Magazine { editor: String, issn: String },
}

impl PublicationKind {
    /// Type tag used in storage and API payloads.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Book { .. } => "book",
            Self::Magazine { .. } => "magazine",
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Self::Book { author, isbn } => {
                if author.trim().is_empty() {
                    return Err(ValidationError::EmptyAuthor);
                }
                let digits = isbn.chars().filter(|c| c.is_ascii_digit()).count();
                if isbn.trim().is_empty() || digits < ISBN_MIN_DIGITS {
                    return Err(ValidationError::InvalidIsbn);
                }
            }
            Self::Magazine { editor, issn } => {
                if editor.trim().is_empty() {
                    return Err(ValidationError::EmptyEditor);
                }
                if issn.trim().is_empty() {
                    return Err(ValidationError::EmptyIssn);
                }
            }
        }
        Ok(())
    }
}

/// A lendable publication.
///
/// `available_copies` never drops below zero: it only changes through
/// [`Publication::lend_one_copy`], [`Publication::return_one_copy`] and the
/// validated [`Publication::set_available_copies`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Publication {
    id: Option<i64>,
    title: String,
    publication_year: i32,
    available_copies: i32,
    kind: PublicationKind,
}

impl Publication {
    /// Creates a validated publication that has not been stored yet.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::EmptyTitle`] for a blank title
    /// - [`ValidationError::NonPositiveYear`] / [`ValidationError::FutureYear`]
    ///   when the year is not in `1..=clock.current_year()`
    /// - [`ValidationError::NegativeAvailableCopies`] for a negative stock
    /// - variant errors for author, ISBN, editor or ISSN
    pub fn new(
        title: String,
        publication_year: i32,
        available_copies: i32,
        kind: PublicationKind,
        clock: &dyn Clock,
    ) -> Result<Self, ValidationError> {
        if title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        validate_year(publication_year, clock)?;
        if available_copies < 0 {
            return Err(ValidationError::NegativeAvailableCopies(available_copies));
        }
        kind.validate()?;

        Ok(Self {
            id: None,
            title,
            publication_year,
            available_copies,
            kind,
        })
    }

    /// Creates a validated book.
    pub fn book(
        title: impl Into<String>,
        author: impl Into<String>,
        isbn: impl Into<String>,
        publication_year: i32,
        available_copies: i32,
        clock: &dyn Clock,
    ) -> Result<Self, ValidationError> {
        let kind = PublicationKind::Book {
            author: author.into(),
            isbn: isbn.into(),
        };
        Self::new(title.into(), publication_year, available_copies, kind, clock)
    }

    /// Creates a validated magazine.
    pub fn magazine(
        title: impl Into<String>,
        editor: impl Into<String>,
        issn: impl Into<String>,
        publication_year: i32,
        available_copies: i32,
        clock: &dyn Clock,
    ) -> Result<Self, ValidationError> {
        let kind = PublicationKind::Magazine {
            editor: editor.into(),
            issn: issn.into(),
        };
        Self::new(title.into(), publication_year, available_copies, kind, clock)
    }

    /// Rebuilds a stored publication without re-running creation checks.
    ///
    /// A negative stored count is clamped to zero.
    pub fn restore(
        id: i64,
        title: String,
        publication_year: i32,
        available_copies: i32,
        kind: PublicationKind,
    ) -> Self {
        Self {
            id: Some(id),
            title,
            publication_year,
            available_copies: available_copies.max(0),
            kind,
        }
    }

    /// Returns the publication with its storage id assigned.
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn publication_year(&self) -> i32 {
        self.publication_year
    }

    pub fn available_copies(&self) -> i32 {
        self.available_copies
    }

    pub fn kind(&self) -> &PublicationKind {
        &self.kind
    }

    /// Whether at least one copy can be lent.
    pub fn is_available(&self) -> bool {
        self.available_copies > 0
    }

    /// Takes one copy out of the available stock.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NoAvailableCopies`] when the stock is empty.
    pub fn lend_one_copy(&mut self) -> Result<(), ValidationError> {
        if self.available_copies == 0 {
            return Err(ValidationError::NoAvailableCopies {
                title: self.title.clone(),
            });
        }
        self.available_copies -= 1;
        Ok(())
    }

    /// Puts one copy back into the available stock.
    pub fn return_one_copy(&mut self) {
        self.available_copies += 1;
    }

    /// Overwrites the available stock.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NegativeAvailableCopies`] for `copies < 0`.
    pub fn set_available_copies(&mut self, copies: i32) -> Result<(), ValidationError> {
        if copies < 0 {
            return Err(ValidationError::NegativeAvailableCopies(copies));
        }
        self.available_copies = copies;
        Ok(())
    }
}

fn validate_year(year: i32, clock: &dyn Clock) -> Result<(), ValidationError> {
    if year <= 0 {
        return Err(ValidationError::NonPositiveYear(year));
    }
    let current = clock.current_year();
    if year > current {
        return Err(ValidationError::FutureYear { year, current });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::clock::FixedClock;
    use chrono::NaiveDate;

    fn clock() -> FixedClock {
        FixedClock::new(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
    }

    fn dune() -> Publication {
        Publication::book("Dune", "Herbert", "9780441013593", 1965, 3, &clock()).unwrap()
    }

    #[test]
    fn test_book_creation() {
        let book = dune();

        assert_eq!(book.id(), None);
        assert_eq!(book.title(), "Dune");
        assert_eq!(book.publication_year(), 1965);
        assert_eq!(book.available_copies(), 3);
        assert_eq!(book.kind().tag(), "book");
    }

    #[test]
    fn test_dune_lend_and_return() {
        let mut book = dune();

        book.lend_one_copy().unwrap();
        assert_eq!(book.available_copies(), 2);

        book.return_one_copy();
        assert_eq!(book.available_copies(), 3);
    }

    #[test]
    fn test_lend_with_no_copies_fails() {
        let mut book =
            Publication::book("Dune", "Herbert", "9780441013593", 1965, 0, &clock()).unwrap();

        let err = book.lend_one_copy().unwrap_err();
        assert_eq!(
            err,
            ValidationError::NoAvailableCopies {
                title: "Dune".to_string()
            }
        );
        assert_eq!(book.available_copies(), 0);
    }

    #[test]
    fn test_lend_n_then_return_n_restores_stock() {
        let mut book = dune();

        for _ in 0..3 {
            book.lend_one_copy().unwrap();
        }
        assert_eq!(book.available_copies(), 0);
        assert!(book.lend_one_copy().is_err());

        for _ in 0..3 {
            book.return_one_copy();
        }
        assert_eq!(book.available_copies(), 3);
    }

    #[test]
    fn test_copies_never_negative_over_every_sequence() {
        const STEPS: u32 = 10;

        for start in 0..=2 {
            // Each bit of `mask` picks lend (1) or return (0) for one step.
            for mask in 0u32..(1 << STEPS) {
                let mut book = dune();
                book.set_available_copies(start).unwrap();
                let mut expected = start;

                for step in 0..STEPS {
                    if mask & (1 << step) != 0 {
                        let lent = book.lend_one_copy();
                        assert_eq!(lent.is_ok(), expected > 0, "mask {mask:#b}");
                        if lent.is_ok() {
                            expected -= 1;
                        }
                    } else {
                        book.return_one_copy();
                        expected += 1;
                    }
                    assert!(book.available_copies() >= 0, "mask {mask:#b}");
                    assert_eq!(book.available_copies(), expected, "mask {mask:#b}");
                }
            }
        }
    }

    #[test]
    fn test_set_available_copies() {
        let mut book = dune();

        assert!(book.set_available_copies(10).is_ok());
        assert_eq!(book.available_copies(), 10);

        assert_eq!(
            book.set_available_copies(-1),
            Err(ValidationError::NegativeAvailableCopies(-1))
        );
        assert_eq!(book.available_copies(), 10);
    }

    #[test]
    fn test_year_validation() {
        let clock = clock();

        let err = Publication::book("T", "A", "9780441013593", 0, 1, &clock).unwrap_err();
        assert_eq!(err, ValidationError::NonPositiveYear(0));

        let err = Publication::book("T", "A", "9780441013593", 2025, 1, &clock).unwrap_err();
        assert_eq!(
            err,
            ValidationError::FutureYear {
                year: 2025,
                current: 2024
            }
        );

        assert!(Publication::book("T", "A", "9780441013593", 2024, 1, &clock).is_ok());
    }

    #[test]
    fn test_year_checked_against_pinned_year() {
        let clock = clock().with_year(1960);

        let err = Publication::book("Dune", "Herbert", "9780441013593", 1965, 3, &clock)
            .unwrap_err();
        assert_eq!(err.kind(), "FutureYear");
    }

    #[test]
    fn test_book_field_validation() {
        let clock = clock();

        let err = Publication::book("  ", "A", "9780441013593", 2000, 1, &clock).unwrap_err();
        assert_eq!(err, ValidationError::EmptyTitle);

        let err = Publication::book("T", "", "9780441013593", 2000, 1, &clock).unwrap_err();
        assert_eq!(err, ValidationError::EmptyAuthor);

        let err = Publication::book("T", "A", "978-0-441", 2000, 1, &clock).unwrap_err();
        assert_eq!(err, ValidationError::InvalidIsbn);

        // Separators are allowed as long as 13 digits are present.
        assert!(Publication::book("T", "A", "978-0-441-01359-3", 2000, 1, &clock).is_ok());

        let err = Publication::book("T", "A", "9780441013593", 2000, -2, &clock).unwrap_err();
        assert_eq!(err, ValidationError::NegativeAvailableCopies(-2));
    }

    #[test]
    fn test_magazine_field_validation() {
        let clock = clock();

        let magazine =
            Publication::magazine("Wired", "Anderson", "1059-1028", 2020, 4, &clock).unwrap();
        assert_eq!(magazine.kind().tag(), "magazine");

        let err = Publication::magazine("Wired", " ", "1059-1028", 2020, 4, &clock).unwrap_err();
        assert_eq!(err, ValidationError::EmptyEditor);

        let err = Publication::magazine("Wired", "Anderson", "", 2020, 4, &clock).unwrap_err();
        assert_eq!(err, ValidationError::EmptyIssn);
    }

    #[test]
    fn test_restore_keeps_stored_values() {
        let kind = PublicationKind::Magazine {
            editor: "E".to_string(),
            issn: "1234-5678".to_string(),
        };
        let publication = Publication::restore(7, "Old".to_string(), 1900, -3, kind);

        assert_eq!(publication.id(), Some(7));
        assert_eq!(publication.available_copies(), 0);
        assert!(!publication.is_available());
    }
}
