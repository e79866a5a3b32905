//! Auth Gateway Port - Login, signup, and current-user lookup.
//!
//! The auth backend issues bearer tokens; this port hides whether it is
//! reached over HTTP or replaced by a mock in tests.

use async_trait::async_trait;
use secrecy::SecretString;

use crate::domain::foundation::ClientError;
use crate::domain::session::{LoginCredentials, Session, SignupDetails, UserProfile};

/// Port for the authentication backend.
///
/// # Contract
///
/// Implementations must:
/// - Return `ClientError::Auth(AuthError::InvalidCredentials)` carrying the
///   backend's message when credentials are refused
/// - Return `ClientError::Auth(AuthError::InvalidToken)` when `current_user`
///   is given a token the backend rejects
/// - Return `ClientError::Network` when the backend cannot be reached
/// - Never log the password or token
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Exchange credentials for a session.
    async fn login(&self, credentials: &LoginCredentials) -> Result<Session, ClientError>;

    /// Create an account and sign in.
    async fn signup(&self, details: &SignupDetails) -> Result<Session, ClientError>;

    /// Look up the user a previously issued token belongs to.
    async fn current_user(&self, token: &SecretString) -> Result<UserProfile, ClientError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_gateway_is_object_safe() {
        fn check<T: AuthGateway + ?Sized>() {}
        check::<dyn AuthGateway>();
    }
}
