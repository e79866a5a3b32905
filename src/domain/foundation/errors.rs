//! Error types for the domain layer.

use thiserror::Error;

use super::AuthError;

/// Errors raised by local preconditions before anything reaches the network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' must be between {min} and {max}, got {actual}")]
    OutOfRange {
        field: String,
        min: i64,
        max: i64,
        actual: i64,
    },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    #[error("Field '{field}' must be at least {min} characters, got {actual}")]
    TooShort {
        field: String,
        min: usize,
        actual: usize,
    },

    #[error("Field '{field}' does not match its confirmation")]
    Mismatch { field: String },

    /// Question numbers are reported 1-based for display; `index` stays 0-based.
    #[error("Please answer all questions. Question {} is unanswered.", .index + 1)]
    Unanswered { index: usize },

    #[error("Choice '{label}' is not an option for question {}", .index + 1)]
    UnknownChoice { index: usize, label: String },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Creates an out of range validation error.
    pub fn out_of_range(field: impl Into<String>, min: i64, max: i64, actual: i64) -> Self {
        ValidationError::OutOfRange {
            field: field.into(),
            min,
            max,
            actual,
        }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates a minimum length validation error.
    pub fn too_short(field: impl Into<String>, min: usize, actual: usize) -> Self {
        ValidationError::TooShort {
            field: field.into(),
            min,
            actual,
        }
    }

    /// Creates a confirmation mismatch validation error.
    pub fn mismatch(field: impl Into<String>) -> Self {
        ValidationError::Mismatch { field: field.into() }
    }
}

/// The four error kinds a user can be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A local precondition failed.
    Validation,
    /// Invalid credentials or an expired/rejected token.
    Auth,
    /// Unknown result id.
    NotFound,
    /// Request failed, no response, or the backend reported a failure.
    Network,
}

/// Errors returned by backend clients.
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("{0}")]
    NotFound(String),

    #[error("Network error: {0}")]
    Network(String),

    /// Backend answered with an error status; `message` is its own wording.
    #[error("{message}")]
    Backend { status: u16, message: String },

    #[error("Unexpected response from backend: {0}")]
    Decode(String),
}

impl ClientError {
    /// Creates a network error.
    pub fn network(reason: impl Into<String>) -> Self {
        Self::Network(reason.into())
    }

    /// Creates a not found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Classifies this error into one of the user-facing kinds.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Validation(_) => ErrorKind::Validation,
            ClientError::Auth(_) => ErrorKind::Auth,
            ClientError::NotFound(_) => ErrorKind::NotFound,
            ClientError::Network(_) | ClientError::Backend { .. } | ClientError::Decode(_) => {
                ErrorKind::Network
            }
        }
    }

    /// Returns true if the session must be torn down and the user sent to login.
    pub fn requires_login(&self) -> bool {
        matches!(self, ClientError::Auth(err) if err.requires_reauthentication())
    }

    /// Message suitable for showing next to the control that failed.
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}
