//! Validation error types

use std::fmt;

/// Validation error for request input
#[derive(Debug, Clone)]
pub enum ValidationError {
    /// Field is empty when it shouldn't be
    Empty { field: &'static str },

    /// Field exceeds maximum length
    TooLong { field: &'static str, max: usize },

    /// Field could not be parsed into its expected shape
    Malformed { field: &'static str, reason: String },

    /// Selected phrase does not belong to the voted pair
    PhraseNotInPair { phrase_id: i64, pair_id: i64 },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{} cannot be empty", field),
            Self::TooLong { field, max } => {
                write!(f, "{} exceeds maximum length of {} characters", field, max)
            }
            Self::Malformed { field, reason } => {
                write!(f, "{}: {}", field, reason)
            }
            Self::PhraseNotInPair { phrase_id, pair_id } => {
                write!(f, "phrase {} is not part of pair {}", phrase_id, pair_id)
            }
        }
    }
}

impl std::error::Error for ValidationError {}
