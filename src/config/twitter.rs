//! Twitter analysis configuration

use serde::Deserialize;

/// Twitter analysis configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct TwitterConfig {
    /// Which data source strategy the Twitter flow uses
    #[serde(default)]
    pub data_source: TwitterDataSource,
}

/// Data source strategy for Twitter analysis.
///
/// The backend ships two analysis paths. `Hybrid` reads the real Twitter API
/// and falls back to mock profiles, so any public handle may be submitted.
/// `Demo` is backed by mock profiles only, so submissions are restricted to
/// the handles the backend advertises as available.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TwitterDataSource {
    #[default]
    Hybrid,
    Demo,
}

impl TwitterDataSource {
    /// Returns true if only advertised demo handles may be analyzed.
    pub fn restricts_to_suggestions(&self) -> bool {
        matches!(self, TwitterDataSource::Demo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_hybrid() {
        assert_eq!(TwitterConfig::default().data_source, TwitterDataSource::Hybrid);
    }

    #[test]
    fn test_data_source_deserialization() {
        let config: TwitterConfig = serde_json::from_str(r#"{"data_source": "demo"}"#).unwrap();
        assert_eq!(config.data_source, TwitterDataSource::Demo);
        assert!(config.data_source.restricts_to_suggestions());
        assert!(!TwitterDataSource::Hybrid.restricts_to_suggestions());
    }
}
