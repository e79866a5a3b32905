//! File-based Token Store Adapter
//!
//! Persists the session token as a small YAML document so a restart can
//! restore the session. Writes go through a temp file and a rename, and on
//! Unix the file is readable by its owner only.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::domain::foundation::Timestamp;
use crate::ports::{TokenStore, TokenStoreError};

/// On-disk shape of the token file
#[derive(Debug, Serialize, Deserialize)]
struct StoredToken {
    token: String,
    saved_at: Timestamp,
}

/// YAML file storage for the session token
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Create a store backed by the given file
    ///
    /// # Example
    /// ```ignore
    /// let store = FileTokenStore::new(".mindmorph/session.yaml");
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "session.yaml".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    async fn ensure_parent_dir(&self) -> Result<(), TokenStoreError> {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent)
                .await
                .map_err(|e| TokenStoreError::IoError(e.to_string())),
            _ => Ok(()),
        }
    }

    #[cfg(unix)]
    async fn restrict_permissions(path: &Path) -> Result<(), TokenStoreError> {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
            .await
            .map_err(|e| TokenStoreError::IoError(e.to_string()))
    }

    #[cfg(not(unix))]
    async fn restrict_permissions(_path: &Path) -> Result<(), TokenStoreError> {
        Ok(())
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> Result<Option<SecretString>, TokenStoreError> {
        let yaml = match fs::read_to_string(&self.path).await {
            Ok(yaml) => yaml,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(TokenStoreError::IoError(e.to_string())),
        };

        let stored: StoredToken = serde_yaml::from_str(&yaml)
            .map_err(|e| TokenStoreError::DeserializationFailed(e.to_string()))?;

        if stored.token.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(SecretString::new(stored.token)))
    }

    async fn save(&self, token: &SecretString) -> Result<(), TokenStoreError> {
        self.ensure_parent_dir().await?;

        let yaml = serde_yaml::to_string(&StoredToken {
            token: token.expose_secret().clone(),
            saved_at: Timestamp::now(),
        })
        .map_err(|e| TokenStoreError::SerializationFailed(e.to_string()))?;

        let temp_path = self.temp_path();
        fs::write(&temp_path, yaml)
            .await
            .map_err(|e| TokenStoreError::IoError(e.to_string()))?;
        Self::restrict_permissions(&temp_path).await?;
        fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| TokenStoreError::IoError(e.to_string()))?;

        tracing::debug!(path = %self.path.display(), "Session token saved");
        Ok(())
    }

    async fn clear(&self) -> Result<(), TokenStoreError> {
        match fs::remove_file(&self.path).await {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), "Session token removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(TokenStoreError::IoError(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_store() -> (FileTokenStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = FileTokenStore::new(temp_dir.path().join("nested").join("session.yaml"));
        (store, temp_dir)
    }

    #[tokio::test]
    async fn load_returns_none_when_file_missing() {
        let (store, _temp) = create_store();
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_then_load_returns_token() {
        let (store, _temp) = create_store();
        store
            .save(&SecretString::new("eyJhbGciOi.token".to_string()))
            .await
            .unwrap();

        let loaded = store.load().await.unwrap().unwrap();
        assert_eq!(loaded.expose_secret(), "eyJhbGciOi.token");
        assert!(!store.temp_path().exists());
    }

    #[tokio::test]
    async fn save_overwrites_previous_token() {
        let (store, _temp) = create_store();
        store.save(&SecretString::new("first".to_string())).await.unwrap();
        store.save(&SecretString::new("second".to_string())).await.unwrap();

        let loaded = store.load().await.unwrap().unwrap();
        assert_eq!(loaded.expose_secret(), "second");
    }

    #[tokio::test]
    async fn clear_is_idempotent() {
        let (store, _temp) = create_store();
        store.save(&SecretString::new("tok".to_string())).await.unwrap();

        store.clear().await.unwrap();
        store.clear().await.unwrap();
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn corrupt_file_is_a_deserialization_error() {
        let (store, _temp) = create_store();
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), "token: [unclosed").unwrap();

        let err = store.load().await.unwrap_err();
        assert!(matches!(err, TokenStoreError::DeserializationFailed(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn token_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let (store, _temp) = create_store();
        store.save(&SecretString::new("tok".to_string())).await.unwrap();

        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
