//! Event journal error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum JournalError {
    #[error("failed to serialize journal entries: {message}")]
    SerializeFailed { message: String },

    #[error("record not found: {id}")]
    RecordNotFound { id: String },

    #[error("invalid capacity: {value}")]
    InvalidCapacity { value: usize },
}

impl UserFacingError for JournalError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::RecordNotFound { .. } => {
                Some("List the journal to see the identifiers currently present.")
            }
            Self::InvalidCapacity { .. } => Some("Journal capacity must be at least 1."),
            _ => None,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::SerializeFailed { .. } => "journal.serialize_failed",
            Self::RecordNotFound { .. } => "journal.record_not_found",
            Self::InvalidCapacity { .. } => "journal.invalid_capacity",
        };
        Some(code)
    }
}
