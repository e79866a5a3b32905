//! Backend API configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Backend API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to (includes the `/api` prefix)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Deployment environment of the backend
    #[serde(default)]
    pub environment: Environment,
}

/// Backend environment
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl ApiConfig {
    /// Get request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if talking to a production backend
    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Base URL without a trailing slash
    pub fn normalized_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Validate API configuration
    ///
    /// In production, requires HTTPS for the base URL.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.base_url.is_empty() {
            return Err(ValidationError::MissingRequired("API_BASE_URL"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidBaseUrl);
        }
        if self.is_production() && !self.base_url.starts_with("https://") {
            return Err(ValidationError::BaseUrlMustBeHttps);
        }
        if self.timeout_secs == 0 || self.timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            environment: Environment::default(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:5000/api".to_string()
}

fn default_timeout() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_config_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.base_url, "http://localhost:5000/api");
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.environment, Environment::Development);
    }

    #[test]
    fn test_normalized_base_url_strips_trailing_slash() {
        let config = ApiConfig {
            base_url: "https://mindmorph.example.com/api/".to_string(),
            ..Default::default()
        };
        assert_eq!(config.normalized_base_url(), "https://mindmorph.example.com/api");
    }

    #[test]
    fn test_validation_rejects_missing_scheme() {
        let config = ApiConfig {
            base_url: "localhost:5000".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ValidationError::InvalidBaseUrl)));
    }

    #[test]
    fn test_validation_production_requires_https() {
        let mut config = ApiConfig::default();
        // Allowed in development
        assert!(config.validate().is_ok());

        config.environment = Environment::Production;
        assert!(matches!(config.validate(), Err(ValidationError::BaseUrlMustBeHttps)));

        config.base_url = "https://mindmorph.example.com/api".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_invalid_timeout() {
        let config = ApiConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ApiConfig {
            timeout_secs: 500,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
