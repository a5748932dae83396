//! Domain error kinds.
//!
//! [`ValidationError`] is raised while constructing or mutating an entity.
//! [`OrchestrationError`] is raised by service-level rules that span several
//! entities or lookups. Both are converted into [`crate::error::AppError`] at the
//! service boundary, where they map to different HTTP status codes.

use chrono::NaiveDate;
use thiserror::Error;

/// Entity-level rule violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Title must not be empty")]
    EmptyTitle,

    #[error("Publication year must be positive, got {0}")]
    NonPositiveYear(i32),

    #[error("Publication year {year} is after the current year {current}")]
    FutureYear { year: i32, current: i32 },

    #[error("Available copies must not be negative, got {0}")]
    NegativeAvailableCopies(i32),

    #[error("No available copies left for '{title}'")]
    NoAvailableCopies { title: String },

    #[error("Author must not be empty")]
    EmptyAuthor,

    #[error("ISBN must contain at least 13 digits")]
    InvalidIsbn,

    #[error("Editor must not be empty")]
    EmptyEditor,

    #[error("ISSN must not be empty")]
    EmptyIssn,

    #[error("Name must not be blank")]
    BlankName,

    #[error("Age must be between 0 and 101, got {0}")]
    InvalidAge(i32),

    #[error("Email must contain '@' and '.'")]
    InvalidEmail,

    #[error("Password must be at least 8 characters long")]
    ShortPassword,

    #[error("Loan requires a registered user")]
    MissingUser,

    #[error("Invalid publications: {0}")]
    InvalidPublications(String),

    #[error("Loan start date {0} is in the future")]
    FutureStartDate(NaiveDate),

    #[error("Loan has already been returned")]
    AlreadyReturned,

    #[error("Return date is missing or malformed")]
    InvalidReturnDate,

    #[error("Return date {return_date} is before start date {start_date}")]
    ReturnDateBeforeStartDate {
        return_date: NaiveDate,
        start_date: NaiveDate,
    },

    #[error("Return date {0} is in the future")]
    FutureReturnDate(NaiveDate),

    #[error("End date {end_date} is before start date {start_date}")]
    EndDateBeforeStartDate {
        end_date: NaiveDate,
        start_date: NaiveDate,
    },

    #[error("Loan has not been returned yet")]
    LoanNotReturned,

    #[error("Membership start date {0} is in the past")]
    StartDateInPast(NaiveDate),

    #[error("Membership end date must be {expected}, got {actual}")]
    EndDateMismatch {
        expected: NaiveDate,
        actual: NaiveDate,
    },

    #[error("Unknown membership type '{0}'")]
    InvalidMembershipType(String),

    #[error("Free loans for {membership_type} must be between {min} and {max}, got {actual}")]
    InvalidFreeLoans {
        membership_type: String,
        min: i32,
        max: i32,
        actual: i32,
    },
}

impl ValidationError {
    /// Stable key identifying the violation, independent of its message.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::EmptyTitle => "EmptyTitle",
            Self::NonPositiveYear(_) => "NonPositiveYear",
            Self::FutureYear { .. } => "FutureYear",
            Self::NegativeAvailableCopies(_) => "NegativeAvailableCopies",
            Self::NoAvailableCopies { .. } => "NoAvailableCopies",
            Self::EmptyAuthor => "EmptyAuthor",
            Self::InvalidIsbn => "InvalidIsbn",
            Self::EmptyEditor => "EmptyEditor",
            Self::EmptyIssn => "EmptyIssn",
            Self::BlankName => "BlankName",
            Self::InvalidAge(_) => "InvalidAge",
            Self::InvalidEmail => "InvalidEmail",
            Self::ShortPassword => "ShortPassword",
            Self::MissingUser => "MissingUser",
            Self::InvalidPublications(_) => "InvalidPublications",
            Self::FutureStartDate(_) => "FutureStartDate",
            Self::AlreadyReturned => "AlreadyReturned",
            Self::InvalidReturnDate => "InvalidReturnDate",
            Self::ReturnDateBeforeStartDate { .. } => "ReturnDateBeforeStartDate",
            Self::FutureReturnDate(_) => "FutureReturnDate",
            Self::EndDateBeforeStartDate { .. } => "EndDateBeforeStartDate",
            Self::LoanNotReturned => "LoanNotReturned",
            Self::StartDateInPast(_) => "StartDateInPast",
            Self::EndDateMismatch { .. } => "EndDateMismatch",
            Self::InvalidMembershipType(_) => "InvalidMembershipType",
            Self::InvalidFreeLoans { .. } => "InvalidFreeLoans",
        }
    }
}

/// Service-level rule violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrchestrationError {
    #[error("User '{0}' not found")]
    UserNotFound(String),

    #[error("User '{0}' already exists")]
    UserAlreadyExists(String),

    #[error("Publications not found: {0:?}")]
    PublicationNotFound(Vec<i64>),

    #[error("Loan {0} not found")]
    LoanNotFound(i64),

    #[error("User '{0}' still has active loans")]
    UserHasActiveLoans(String),

    #[error("User '{0}' has no loans")]
    UserHasNoLoans(String),

    #[error("Membership has no free loans left")]
    NoFreeLoans,

    #[error("Membership overlaps an existing membership of user {0}")]
    OverlappingMembership(i64),

    #[error("Publication {0} ran out of copies")]
    CopiesExhausted(i64),
}

impl OrchestrationError {
    /// Stable key identifying the violation, independent of its message.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UserNotFound(_) => "UserNotFound",
            Self::UserAlreadyExists(_) => "UserAlreadyExists",
            Self::PublicationNotFound(_) => "PublicationNotFound",
            Self::LoanNotFound(_) => "LoanNotFound",
            Self::UserHasActiveLoans(_) => "UserHasActiveLoans",
            Self::UserHasNoLoans(_) => "UserHasNoLoans",
            Self::NoFreeLoans => "NoFreeLoans",
            Self::OverlappingMembership(_) => "OverlappingMembership",
            Self::CopiesExhausted(_) => "CopiesExhausted",
        }
    }

    /// Whether the violation means a referenced record does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound(_) | Self::PublicationNotFound(_) | Self::LoanNotFound(_)
        )
    }
}
