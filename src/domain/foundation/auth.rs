//! Authentication errors for the domain layer.
//!
//! These describe what went wrong from the client's perspective, not the
//! backend's. Any variant that [`AuthError::requires_reauthentication`] forces
//! session teardown and a redirect to the login screen.

use thiserror::Error;

/// Authentication errors raised by login, signup, or any authenticated call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The backend refused the credentials; carries its displayable message.
    #[error("{0}")]
    InvalidCredentials(String),

    /// The token is missing, malformed, or was rejected.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// The token has expired (separate from InvalidToken for specific handling).
    #[error("Your session has expired. Please log in again.")]
    TokenExpired,

    /// The authentication service is unavailable (network, config, etc.).
    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    /// Creates an invalid credentials error with the backend's message.
    pub fn invalid_credentials(message: impl Into<String>) -> Self {
        Self::InvalidCredentials(message.into())
    }

    /// Creates a service unavailable error with a message.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    /// Returns true if this error indicates the user should re-authenticate.
    pub fn requires_reauthentication(&self) -> bool {
        matches!(self, AuthError::InvalidToken | AuthError::TokenExpired)
    }

    /// Returns true if this is a transient error that may succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, AuthError::ServiceUnavailable(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_credentials_shows_backend_message() {
        let err = AuthError::invalid_credentials("Invalid email or password");
        assert_eq!(err.to_string(), "Invalid email or password");
        assert!(!err.requires_reauthentication());
    }

    #[test]
    fn token_errors_require_reauthentication() {
        assert!(AuthError::InvalidToken.requires_reauthentication());
        assert!(AuthError::TokenExpired.requires_reauthentication());
        assert!(!AuthError::service_unavailable("down").requires_reauthentication());
    }

    #[test]
    fn service_unavailable_is_transient() {
        assert!(AuthError::service_unavailable("timeout").is_transient());
        assert!(!AuthError::InvalidToken.is_transient());
    }
}
