//! In-Memory Token Store Adapter
//!
//! Keeps the token in memory only. Useful for tests and for a CLI run
//! that should not touch the disk.

use async_trait::async_trait;
use secrecy::SecretString;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::ports::{TokenStore, TokenStoreError};

/// In-memory storage for the session token
#[derive(Debug, Clone, Default)]
pub struct InMemoryTokenStore {
    token: Arc<RwLock<Option<SecretString>>>,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds a token
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Arc::new(RwLock::new(Some(SecretString::new(token.into())))),
        }
    }

    /// Returns true if a token is currently stored
    pub async fn has_token(&self) -> bool {
        self.token.read().await.is_some()
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn load(&self) -> Result<Option<SecretString>, TokenStoreError> {
        Ok(self.token.read().await.clone())
    }

    async fn save(&self, token: &SecretString) -> Result<(), TokenStoreError> {
        *self.token.write().await = Some(token.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), TokenStoreError> {
        *self.token.write().await = None;
        Ok(())
    }
}
