//! HTTP implementation of the AuthGateway port.

use async_trait::async_trait;
use secrecy::SecretString;

use super::client::{ApiClient, Auth};
use super::dto::{AuthResponse, LoginRequest, MeResponse, SignupRequest};
use crate::domain::foundation::{AuthError, ClientError};
use crate::domain::session::{LoginCredentials, Session, SignupDetails, UserProfile};
use crate::ports::AuthGateway;

/// Auth endpoints under `/auth`.
#[derive(Debug, Clone)]
pub struct HttpAuthGateway {
    api: ApiClient,
}

impl HttpAuthGateway {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl AuthGateway for HttpAuthGateway {
    #[tracing::instrument(skip(self, credentials), fields(email = %credentials.email))]
    async fn login(&self, credentials: &LoginCredentials) -> Result<Session, ClientError> {
        let request = LoginRequest {
            email: &credentials.email,
            password: credentials.password(),
        };
        let response: AuthResponse = self.api.post_json("auth/login", &request, Auth::Public).await?;
        response.into_session()
    }

    #[tracing::instrument(skip(self, details), fields(email = %details.email))]
    async fn signup(&self, details: &SignupDetails) -> Result<Session, ClientError> {
        let request = SignupRequest {
            name: &details.name,
            email: &details.email,
            password: details.password(),
        };
        let response: AuthResponse = self
            .api
            .post_json("auth/signup", &request, Auth::Public)
            .await
            .map_err(signup_error)?;
        response.into_session()
    }

    #[tracing::instrument(skip_all)]
    async fn current_user(&self, token: &SecretString) -> Result<UserProfile, ClientError> {
        let response: MeResponse = self
            .api
            .get_json("auth/me", Auth::Token(token))
            .await
            .map_err(|e| match e {
                // The user behind the token no longer exists.
                ClientError::NotFound(_) => AuthError::InvalidToken.into(),
                other => other,
            })?;
        response.user.into_profile()
    }
}

/// Signup rejections (e.g. a taken email) come back as 400 with the reason.
fn signup_error(err: ClientError) -> ClientError {
    match err {
        ClientError::Backend { status: 400, message } => AuthError::invalid_credentials(message).into(),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signup_conflict_becomes_auth_error() {
        let err = signup_error(ClientError::Backend {
            status: 400,
            message: "User already exists".to_string(),
        });
        assert!(matches!(err, ClientError::Auth(AuthError::InvalidCredentials(ref m)) if m == "User already exists"));
        assert_eq!(err.to_string(), "User already exists");
    }

    #[test]
    fn other_signup_failures_pass_through() {
        let err = signup_error(ClientError::network("down"));
        assert!(matches!(err, ClientError::Network(_)));
    }
}
