//! Session identifier validation
//!
//! Sessions are opaque client-supplied strings. The only rules are
//! non-empty after trimming and a length cap matching the vote table.

use super::ValidationError;

/// Maximum length for session identifiers
const MAX_SESSION_ID_LEN: usize = 128;

/// Validated session identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    /// Create a session id, trimming surrounding whitespace.
    ///
    /// # Rules
    /// - Non-empty after trimming
    /// - Max 128 characters
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: "session id" });
        }

        if trimmed.len() > MAX_SESSION_ID_LEN {
            return Err(ValidationError::TooLong {
                field: "session id",
                max: MAX_SESSION_ID_LEN,
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Get the session id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the inner string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for SessionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
