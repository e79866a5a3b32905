//! Session persistence configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Where the session token is persisted between runs
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Path of the YAML file holding the persisted token
    #[serde(default = "default_token_path")]
    pub token_path: PathBuf,
}

impl SessionConfig {
    /// Validate session configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.token_path.as_os_str().is_empty() {
            return Err(ValidationError::MissingRequired("SESSION_TOKEN_PATH"));
        }
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            token_path: default_token_path(),
        }
    }
}

fn default_token_path() -> PathBuf {
    PathBuf::from(".mindmorph/session.yaml")
}
