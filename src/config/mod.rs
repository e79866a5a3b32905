//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `MINDMORPH_` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use mindmorph_client::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Backend at {}", config.api.base_url);
//! ```

mod api;
mod error;
mod export;
mod logging;
mod session;
mod twitter;

pub use api::{ApiConfig, Environment};
pub use error::{ConfigError, ValidationError};
pub use export::ExportConfig;
pub use logging::LoggingConfig;
pub use session::SessionConfig;
pub use twitter::{TwitterConfig, TwitterDataSource};

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults, so an empty environment yields a config that
/// talks to a local development backend.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Backend API configuration (base URL, timeout, environment)
    #[serde(default)]
    pub api: ApiConfig,

    /// Session token persistence
    #[serde(default)]
    pub session: SessionConfig,

    /// Twitter analysis data source
    #[serde(default)]
    pub twitter: TwitterConfig,

    /// Report export (download directory, default format)
    #[serde(default)]
    pub export: ExportConfig,

    /// Logging filter and format
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `MINDMORPH` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `MINDMORPH__API__BASE_URL=...` -> `api.base_url = ...`
    /// - `MINDMORPH__TWITTER__DATA_SOURCE=demo` -> `twitter.data_source = demo`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("MINDMORPH")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.api.validate()?;
        self.session.validate()?;
        self.export.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    /// Check if talking to a production backend
    pub fn is_production(&self) -> bool {
        self.api.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::ExportFormat;
    use std::env;
    use std::path::PathBuf;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// Helper to clear environment variables after testing
    fn clear_env() {
        env::remove_var("MINDMORPH__API__BASE_URL");
        env::remove_var("MINDMORPH__API__TIMEOUT_SECS");
        env::remove_var("MINDMORPH__API__ENVIRONMENT");
        env::remove_var("MINDMORPH__SESSION__TOKEN_PATH");
        env::remove_var("MINDMORPH__TWITTER__DATA_SOURCE");
        env::remove_var("MINDMORPH__EXPORT__DEFAULT_FORMAT");
    }

    #[test]
    fn test_load_with_empty_environment_uses_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.api.base_url, "http://localhost:5000/api");
        assert_eq!(config.twitter.data_source, TwitterDataSource::Hybrid);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("MINDMORPH__API__BASE_URL", "https://mindmorph.example.com/api");
        env::set_var("MINDMORPH__API__TIMEOUT_SECS", "10");
        env::set_var("MINDMORPH__SESSION__TOKEN_PATH", "/tmp/mm/session.yaml");
        env::set_var("MINDMORPH__TWITTER__DATA_SOURCE", "demo");
        env::set_var("MINDMORPH__EXPORT__DEFAULT_FORMAT", "html");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.api.base_url, "https://mindmorph.example.com/api");
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.session.token_path, PathBuf::from("/tmp/mm/session.yaml"));
        assert_eq!(config.twitter.data_source, TwitterDataSource::Demo);
        assert_eq!(config.export.default_format, ExportFormat::Html);
    }

    #[test]
    fn test_is_production() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("MINDMORPH__API__ENVIRONMENT", "production");
        env::set_var("MINDMORPH__API__BASE_URL", "https://mindmorph.example.com/api");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.is_production());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_plain_http_in_production() {
        let mut config = AppConfig::default();
        config.api.environment = Environment::Production;
        assert!(config.validate().is_err());
    }
}
