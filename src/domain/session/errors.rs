//! Session-specific error types.

use thiserror::Error;

use crate::domain::foundation::{ErrorCode, SessionId, ValidationError};

/// Errors surfaced by session operations.
///
/// Extraction and reply-generation failures are absorbed inside a turn and
/// never appear here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Request rejected before any state was touched.
    #[error("Invalid input for '{field}': {reason}")]
    InvalidInput { field: String, reason: String },

    /// No session exists for the identifier.
    #[error("Session not found: {0}")]
    UnknownSession(SessionId),
}

impl SessionError {
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        SessionError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn unknown_session(id: SessionId) -> Self {
        SessionError::UnknownSession(id)
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            SessionError::InvalidInput { .. } => ErrorCode::ValidationFailed,
            SessionError::UnknownSession(_) => ErrorCode::SessionNotFound,
        }
    }

    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl From<ValidationError> for SessionError {
    fn from(err: ValidationError) -> Self {
        SessionError::InvalidInput {
            field: err.field().to_string(),
            reason: err.to_string(),
        }
    }
}
