//! Repository implementations for database access
//!
//! Each repository follows these patterns:
//! - Uses JOINs for list operations (no N+1)
//! - Lets DB constraints arbitrate conflicts (no check-then-insert)
//! - Uses transactions for writes

pub mod pairs;
pub mod votes;

pub use pairs::{ActivePair, PairRepo, PhrasePair, PhraseTotals};
pub use votes::{Vote, VoteRepo};

/// SQLSTATE class for integrity constraint violations
const SQLSTATE_INTEGRITY_CLASS: &str = "23";

/// SQLSTATE for unique constraint violations
const SQLSTATE_UNIQUE_VIOLATION: &str = "23505";

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    #[error("unique constraint '{constraint}' violated")]
    UniqueViolation { constraint: String },

    #[error("constraint violated: {message}")]
    ConstraintViolation { message: String },
}

/// Classify a sqlx error by its SQLSTATE, splitting out constraint
/// violations so callers can map them to conflict/validation responses.
/// Detection is structural (error code + constraint name), never based on
/// the driver's message text.
pub(crate) fn classify(err: sqlx::Error) -> DbError {
    if let sqlx::Error::Database(db_err) = &err {
        if let Some(code) = db_err.code() {
            if code == SQLSTATE_UNIQUE_VIOLATION {
                return DbError::UniqueViolation {
                    constraint: db_err.constraint().unwrap_or("unknown").to_owned(),
                };
            }
            if code.starts_with(SQLSTATE_INTEGRITY_CLASS) {
                return DbError::ConstraintViolation {
                    message: db_err.message().to_owned(),
                };
            }
        }
    }
    DbError::Sqlx(err)
}
