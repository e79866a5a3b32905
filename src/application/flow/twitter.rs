//! Twitter handle flow.

use async_trait::async_trait;
use std::sync::Arc;

use super::controller::{AssessmentStrategy, FlowController, FlowError};
use crate::config::TwitterDataSource;
use crate::domain::assessment::{AssessmentMode, Submission};
use crate::domain::foundation::{ClientError, ValidationError};
use crate::ports::TwitterApi;

pub struct TwitterStrategy {
    api: Arc<dyn TwitterApi>,
    data_source: TwitterDataSource,
}

impl TwitterStrategy {
    pub fn new(api: Arc<dyn TwitterApi>, data_source: TwitterDataSource) -> Self {
        Self { api, data_source }
    }
}

/// Trims and strips one leading `@`.
pub fn normalize_username(raw: &str) -> &str {
    let trimmed = raw.trim();
    trimmed.strip_prefix('@').unwrap_or(trimmed).trim()
}

#[async_trait]
impl AssessmentStrategy for TwitterStrategy {
    /// Suggested demo handles.
    type Input = Vec<String>;
    type Draft = String;
    type Payload = String;

    fn mode(&self) -> AssessmentMode {
        AssessmentMode::Twitter
    }

    async fn fetch_input(&self) -> Result<Vec<String>, ClientError> {
        match self.api.available_usernames().await {
            Ok(usernames) => Ok(usernames),
            Err(e) => {
                tracing::warn!(error = %e, "Could not load suggested usernames");
                Ok(Vec::new())
            }
        }
    }

    fn validate(&self, suggestions: &Vec<String>, raw: &String) -> Result<String, ValidationError> {
        let username = normalize_username(raw);
        if username.is_empty() {
            return Err(ValidationError::empty_field("username"));
        }
        if self.data_source.restricts_to_suggestions()
            && !suggestions.iter().any(|s| s.eq_ignore_ascii_case(username))
        {
            return Err(ValidationError::invalid_format(
                "username",
                "only the suggested demo accounts can be analyzed",
            ));
        }
        Ok(username.to_string())
    }

    async fn submit(&self, username: String) -> Result<Submission, ClientError> {
        self.api.analyze(&username).await
    }

    fn message_for(&self, error: &ValidationError) -> String {
        match error {
            ValidationError::EmptyField { .. } => "Please enter a Twitter username".to_string(),
            ValidationError::InvalidFormat { .. } => {
                "Please choose one of the available demo usernames".to_string()
            }
            other => other.to_string(),
        }
    }
}

pub type TwitterFlow = FlowController<TwitterStrategy>;

impl FlowController<TwitterStrategy> {
    pub fn from_api(api: Arc<dyn TwitterApi>, data_source: TwitterDataSource) -> Self {
        Self::new(TwitterStrategy::new(api, data_source))
    }

    pub fn set_username(&self, username: impl Into<String>) -> Result<(), FlowError> {
        let username = username.into();
        self.edit(|_, draft| {
            *draft = username;
            Ok(())
        })
    }

    /// Prefills the handle from the suggestion list.
    pub fn select_suggestion(&self, username: &str) -> Result<(), FlowError> {
        self.edit(|suggestions, draft| {
            let found = suggestions
                .iter()
                .find(|s| s.eq_ignore_ascii_case(normalize_username(username)))
                .ok_or_else(|| ValidationError::invalid_format("username", "not a suggested account"))?;
            *draft = found.clone();
            Ok(())
        })
    }

    pub fn username(&self) -> String {
        self.view(|_, draft| draft.clone())
    }

    pub fn suggestions(&self) -> Vec<String> {
        self.view(|suggestions, _| suggestions.cloned().unwrap_or_default())
    }

    pub fn data_source(&self) -> TwitterDataSource {
        self.strategy().data_source
    }
}
