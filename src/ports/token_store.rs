//! Token Store Port - Persists the session token across restarts.
//!
//! Only the bearer token is persisted; the user profile is always re-fetched
//! from the backend when a session is restored.

use async_trait::async_trait;
use secrecy::SecretString;

/// Errors that can occur during token persistence
#[derive(Debug, thiserror::Error)]
pub enum TokenStoreError {
    #[error("Failed to serialize token: {0}")]
    SerializationFailed(String),

    #[error("Failed to deserialize token: {0}")]
    DeserializationFailed(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// Port for persisting the session token
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Load the persisted token, if any
    ///
    /// # Returns
    /// `None` when nothing has been saved (or it was cleared)
    async fn load(&self) -> Result<Option<SecretString>, TokenStoreError>;

    /// Persist a token, replacing any previous one
    async fn save(&self, token: &SecretString) -> Result<(), TokenStoreError>;

    /// Remove the persisted token; succeeds if there is none
    async fn clear(&self) -> Result<(), TokenStoreError>;
}
