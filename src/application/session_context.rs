//! SessionContext - owns the signed-in session for the whole client.
//!
//! One instance is created at startup and shared as `Arc<SessionContext>`.
//! It is also the `CredentialSource` for the HTTP clients, so a 401 on any
//! authenticated call ends the session here.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::domain::foundation::{StateMachine, ValidationError};
use crate::domain::session::{
    AuthState, LoginCredentials, Session, SignupDetails, UserProfile, MIN_PASSWORD_LENGTH,
};
use crate::ports::{AuthGateway, CredentialSource, TokenStore, TokenStoreError};

/// Result of a login or signup attempt.
#[derive(Debug, Clone)]
pub enum AuthOutcome {
    Authenticated(Session),
    /// Displayable reason; nothing was stored.
    Rejected(String),
}

impl AuthOutcome {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthOutcome::Authenticated(_))
    }
}

#[derive(Debug, Default)]
struct Slot {
    state: AuthState,
    session: Option<Session>,
}

/// Shared session store.
pub struct SessionContext {
    gateway: Arc<dyn AuthGateway>,
    store: Arc<dyn TokenStore>,
    slot: RwLock<Slot>,
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("state", &self.state())
            .finish()
    }
}

impl SessionContext {
    /// Starts in `Checking`; call [`restore`](Self::restore) next.
    pub fn new(gateway: Arc<dyn AuthGateway>, store: Arc<dyn TokenStore>) -> Self {
        Self {
            gateway,
            store,
            slot: RwLock::new(Slot::default()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Slot> {
        self.slot.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Slot> {
        self.slot.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> AuthState {
        self.read().state
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().session.is_some()
    }

    /// True until the persisted token has been tried.
    pub fn loading(&self) -> bool {
        self.state().is_checking()
    }

    pub fn session(&self) -> Option<Session> {
        self.read().session.clone()
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.read().session.as_ref().map(|s| s.user().clone())
    }

    /// Rebuilds the session from the persisted token.
    ///
    /// A token the backend rejects is deleted. A network failure leaves it
    /// on disk for the next attempt but still ends in `Unauthenticated`.
    #[tracing::instrument(skip(self))]
    pub async fn restore(&self) -> AuthState {
        if self.is_authenticated() {
            return AuthState::Authenticated;
        }

        let token = match self.store.load().await {
            Ok(Some(token)) => token,
            Ok(None) => {
                tracing::debug!("No persisted session token");
                return self.apply(None);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read persisted session token");
                if matches!(e, TokenStoreError::DeserializationFailed(_)) {
                    self.forget_token().await;
                }
                return self.apply(None);
            }
        };

        match self.gateway.current_user(&token).await {
            Ok(user) => {
                tracing::info!(user_id = %user.id, "Session restored");
                self.apply(Some(Session::new(user, token.expose_secret().clone())))
            }
            Err(e) if e.requires_login() => {
                tracing::info!("Persisted session token rejected");
                self.forget_token().await;
                self.apply(None)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Could not verify persisted session; keeping token");
                self.apply(None)
            }
        }
    }

    /// Logs in. Empty fields are rejected without a request.
    #[tracing::instrument(skip_all)]
    pub async fn login(&self, email: &str, password: &str) -> AuthOutcome {
        let credentials = match LoginCredentials::new(email, password) {
            Ok(credentials) => credentials,
            Err(_) => return AuthOutcome::Rejected("Email and password are required".to_string()),
        };

        match self.gateway.login(&credentials).await {
            Ok(session) => self.establish(session).await,
            Err(e) => {
                tracing::info!(error = %e, "Login rejected");
                AuthOutcome::Rejected(e.user_message())
            }
        }
    }

    /// Creates an account. All local checks run before any request.
    #[tracing::instrument(skip_all)]
    pub async fn signup(&self, name: &str, email: &str, password: &str, confirm: &str) -> AuthOutcome {
        let details = match SignupDetails::new(name, email, password, confirm) {
            Ok(details) => details,
            Err(e) => return AuthOutcome::Rejected(signup_message(&e)),
        };

        match self.gateway.signup(&details).await {
            Ok(session) => self.establish(session).await,
            Err(e) => {
                tracing::info!(error = %e, "Signup rejected");
                AuthOutcome::Rejected(e.user_message())
            }
        }
    }

    /// Ends the session and deletes the persisted token. Idempotent.
    pub async fn logout(&self) {
        let was_signed_in = self.is_authenticated();
        self.apply(None);
        if was_signed_in {
            tracing::info!("Logged out");
        }
        self.forget_token().await;
    }

    async fn establish(&self, session: Session) -> AuthOutcome {
        if let Err(e) = self.store.save(session.token()).await {
            tracing::warn!(error = %e, "Failed to persist session token");
        }
        tracing::info!(user_id = %session.user_id(), "Signed in");
        self.apply(Some(session.clone()));
        AuthOutcome::Authenticated(session)
    }

    async fn forget_token(&self) {
        if let Err(e) = self.store.clear().await {
            tracing::warn!(error = %e, "Failed to remove persisted session token");
        }
    }

    /// Replaces the session and moves the auth state to match.
    fn apply(&self, session: Option<Session>) -> AuthState {
        let mut slot = self.write();
        let target = if session.is_some() {
            AuthState::Authenticated
        } else {
            AuthState::Unauthenticated
        };
        if slot.state != target {
            match slot.state.transition_to(target) {
                Ok(next) => slot.state = next,
                Err(e) => tracing::error!(error = %e, "Unexpected auth state change"),
            }
        }
        slot.session = session;
        slot.state
    }
}

fn signup_message(error: &ValidationError) -> String {
    match error {
        ValidationError::EmptyField { .. } => "All fields are required".to_string(),
        ValidationError::Mismatch { .. } => "Passwords do not match".to_string(),
        ValidationError::TooShort { .. } => {
            format!("Password must be at least {} characters", MIN_PASSWORD_LENGTH)
        }
        other => other.to_string(),
    }
}

#[async_trait]
impl CredentialSource for SessionContext {
    fn bearer_token(&self) -> Option<SecretString> {
        self.read().session.as_ref().map(|s| s.token().clone())
    }

    async fn on_unauthorized(&self) {
        tracing::warn!("Backend rejected the session; signing out");
        self.apply(None);
        self.forget_token().await;
    }
}
