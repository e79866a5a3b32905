//! Mock authentication gateway for testing.
//!
//! Implements the `AuthGateway` port without a backend, avoiding the need
//! for a running auth service.
//!
//! # Example
//!
//! ```ignore
//! use mindmorph_client::adapters::auth::MockAuthGateway;
//! use mindmorph_client::domain::session::LoginCredentials;
//!
//! let gateway = MockAuthGateway::new().with_user("ada@example.com", "password123", "Ada");
//!
//! let creds = LoginCredentials::new("ada@example.com", "password123").unwrap();
//! let session = gateway.login(&creds).await.unwrap();
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::domain::foundation::{AuthError, ClientError, UserId};
use crate::domain::session::{LoginCredentials, Session, SignupDetails, UserProfile};
use crate::ports::AuthGateway;

#[derive(Debug, Clone)]
struct Account {
    password: String,
    profile: UserProfile,
}

/// Mock auth gateway for testing.
///
/// Accounts are keyed by email. Every successful login or signup issues a
/// fresh token that `current_user` accepts until it is revoked.
#[derive(Debug, Default)]
pub struct MockAuthGateway {
    accounts: RwLock<HashMap<String, Account>>,
    /// Issued tokens and the user they belong to
    tokens: RwLock<HashMap<String, UserProfile>>,
    /// Optional error to return for every call (for error testing)
    force_error: RwLock<Option<ClientError>>,
    issued: AtomicUsize,
    current_user_calls: AtomicUsize,
}

impl MockAuthGateway {
    /// Creates a new gateway with no accounts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an account that can log in.
    pub fn with_user(
        self,
        email: impl Into<String>,
        password: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        self.add_account(email.into(), password.into(), name.into());
        self
    }

    /// Registers a token that `current_user` resolves to a user.
    pub fn with_token(self, token: impl Into<String>, user: UserProfile) -> Self {
        self.tokens.write().unwrap().insert(token.into(), user);
        self
    }

    /// Forces every call to return the specified error.
    pub fn with_error(self, error: ClientError) -> Self {
        *self.force_error.write().unwrap() = Some(error);
        self
    }

    /// Clears the forced error and returns to normal operation.
    pub fn clear_error(&self) {
        *self.force_error.write().unwrap() = None;
    }

    /// Makes a previously issued token invalid.
    pub fn revoke_token(&self, token: &str) {
        self.tokens.write().unwrap().remove(token);
    }

    /// Number of tokens currently accepted.
    pub fn token_count(&self) -> usize {
        self.tokens.read().unwrap().len()
    }

    /// Number of `current_user` lookups made so far.
    pub fn current_user_calls(&self) -> usize {
        self.current_user_calls.load(Ordering::SeqCst)
    }

    fn add_account(&self, email: String, password: String, name: String) -> UserProfile {
        let mut accounts = self.accounts.write().unwrap();
        let profile = UserProfile {
            id: UserId::new(format!("user-{}", accounts.len() + 1)).unwrap(),
            email: email.clone(),
            name,
        };
        accounts.insert(
            email,
            Account {
                password,
                profile: profile.clone(),
            },
        );
        profile
    }

    fn issue(&self, profile: UserProfile) -> Session {
        let n = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let token = format!("mock-token-{}-{}", profile.id.as_str(), n);
        self.tokens.write().unwrap().insert(token.clone(), profile.clone());
        Session::new(profile, token)
    }

    fn forced(&self) -> Result<(), ClientError> {
        match self.force_error.read().unwrap().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl AuthGateway for MockAuthGateway {
    async fn login(&self, credentials: &LoginCredentials) -> Result<Session, ClientError> {
        self.forced()?;

        let account = self.accounts.read().unwrap().get(&credentials.email).cloned();
        match account {
            Some(account) if account.password == credentials.password() => Ok(self.issue(account.profile)),
            _ => Err(AuthError::invalid_credentials("Invalid email or password").into()),
        }
    }

    async fn signup(&self, details: &SignupDetails) -> Result<Session, ClientError> {
        self.forced()?;

        if self.accounts.read().unwrap().contains_key(&details.email) {
            return Err(AuthError::invalid_credentials("User already exists").into());
        }
        let profile = self.add_account(
            details.email.clone(),
            details.password().to_string(),
            details.name.clone(),
        );
        Ok(self.issue(profile))
    }

    async fn current_user(&self, token: &SecretString) -> Result<UserProfile, ClientError> {
        self.current_user_calls.fetch_add(1, Ordering::SeqCst);
        self.forced()?;

        self.tokens
            .read()
            .unwrap()
            .get(token.expose_secret())
            .cloned()
            .ok_or_else(|| AuthError::InvalidToken.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway() -> MockAuthGateway {
        MockAuthGateway::new().with_user("ada@example.com", "password123", "Ada")
    }

    #[tokio::test]
    async fn login_with_registered_account_succeeds() {
        let gateway = gateway();
        let creds = LoginCredentials::new("ada@example.com", "password123").unwrap();

        let session = gateway.login(&creds).await.unwrap();
        assert_eq!(session.user().name, "Ada");

        let user = gateway.current_user(session.token()).await.unwrap();
        assert_eq!(user.email, "ada@example.com");
    }

    #[tokio::test]
    async fn wrong_password_is_rejected_with_backend_message() {
        let creds = LoginCredentials::new("ada@example.com", "nope-nope").unwrap();
        let err = gateway().login(&creds).await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid email or password");
    }

    #[tokio::test]
    async fn duplicate_signup_is_rejected() {
        let details =
            SignupDetails::new("Ada", "ada@example.com", "password123", "password123").unwrap();
        let err = gateway().signup(&details).await.unwrap_err();
        assert_eq!(err.to_string(), "User already exists");
    }

    #[tokio::test]
    async fn revoked_token_is_invalid() {
        let gateway = gateway();
        let creds = LoginCredentials::new("ada@example.com", "password123").unwrap();
        let session = gateway.login(&creds).await.unwrap();

        gateway.revoke_token(session.token().expose_secret());

        let err = gateway.current_user(session.token()).await.unwrap_err();
        assert!(err.requires_login());
        assert_eq!(gateway.current_user_calls(), 1);
    }

    #[tokio::test]
    async fn forced_error_applies_to_every_call() {
        let gateway = gateway().with_error(ClientError::network("down"));
        let creds = LoginCredentials::new("ada@example.com", "password123").unwrap();
        assert!(matches!(gateway.login(&creds).await, Err(ClientError::Network(_))));

        gateway.clear_error();
        assert!(gateway.login(&creds).await.is_ok());
    }
}
