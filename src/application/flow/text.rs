//! Free-text flow.

use async_trait::async_trait;
use std::sync::Arc;

use super::controller::{AssessmentStrategy, FlowController, FlowError};
use crate::domain::assessment::{AssessmentMode, Submission};
use crate::domain::foundation::{ClientError, ValidationError};
use crate::ports::TextApi;

/// Fewest characters the backend is asked to analyze.
pub const MIN_TEXT_CHARS: usize = 100;

/// Length from which predictions are noticeably more stable.
pub const RECOMMENDED_TEXT_CHARS: usize = 500;

/// Passage offered to users who want to see the flow without writing.
pub const SAMPLE_TEXT: &str = "I've always been someone who prefers deep, meaningful conversations over small talk. I find myself energized by spending time alone, reading books or working on creative projects. When making decisions, I tend to rely on logic and careful analysis rather than emotions. I like to plan ahead and have a clear structure in my life, though I can be flexible when needed. I'm fascinated by abstract concepts and future possibilities, often thinking about how things could be improved. My friends describe me as thoughtful and analytical, sometimes too focused on my own thoughts. I value competence and efficiency, and I'm always looking for ways to learn and grow. Reading philosophy, solving complex problems, and exploring ideas are some of my favorite activities.";

/// How far the text is from a useful sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextStrength {
    Insufficient,
    Minimum,
    Recommended,
}

impl TextStrength {
    pub fn for_length(characters: usize) -> Self {
        if characters >= RECOMMENDED_TEXT_CHARS {
            TextStrength::Recommended
        } else if characters >= MIN_TEXT_CHARS {
            TextStrength::Minimum
        } else {
            TextStrength::Insufficient
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextMetrics {
    pub characters: usize,
    pub words: usize,
    pub strength: TextStrength,
}

impl TextMetrics {
    pub fn measure(text: &str) -> Self {
        let characters = text.chars().count();
        Self {
            characters,
            words: text.split_whitespace().count(),
            strength: TextStrength::for_length(characters),
        }
    }
}

pub struct TextStrategy {
    api: Arc<dyn TextApi>,
}

impl TextStrategy {
    pub fn new(api: Arc<dyn TextApi>) -> Self {
        Self { api }
    }
}

/// Leading and trailing whitespace does not count toward the minimum.
fn check_text(text: &str) -> Result<(), ValidationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::empty_field("text"));
    }
    let characters = trimmed.chars().count();
    if characters < MIN_TEXT_CHARS {
        return Err(ValidationError::too_short("text", MIN_TEXT_CHARS, characters));
    }
    Ok(())
}

#[async_trait]
impl AssessmentStrategy for TextStrategy {
    type Input = ();
    type Draft = String;
    type Payload = String;

    fn mode(&self) -> AssessmentMode {
        AssessmentMode::Text
    }

    async fn fetch_input(&self) -> Result<(), ClientError> {
        Ok(())
    }

    fn validate(&self, _input: &(), text: &String) -> Result<String, ValidationError> {
        check_text(text)?;
        Ok(text.clone())
    }

    async fn submit(&self, text: String) -> Result<Submission, ClientError> {
        self.api.submit_text(&text).await
    }

    fn message_for(&self, error: &ValidationError) -> String {
        match error {
            ValidationError::EmptyField { .. } | ValidationError::TooShort { .. } => format!(
                "Please provide at least {} characters for accurate analysis.",
                MIN_TEXT_CHARS
            ),
            other => other.to_string(),
        }
    }
}

pub type TextFlow = FlowController<TextStrategy>;

impl FlowController<TextStrategy> {
    pub fn from_api(api: Arc<dyn TextApi>) -> Self {
        Self::new(TextStrategy::new(api))
    }

    pub fn set_text(&self, text: impl Into<String>) -> Result<(), FlowError> {
        let text = text.into();
        self.edit(|_, draft| {
            *draft = text;
            Ok(())
        })
    }

    pub fn use_sample_text(&self) -> Result<(), FlowError> {
        self.set_text(SAMPLE_TEXT)
    }

    pub fn text(&self) -> String {
        self.view(|_, draft| draft.clone())
    }

    /// Whether the submit control is enabled.
    pub fn can_submit(&self) -> bool {
        self.status().accepts_input() && self.view(|_, draft| check_text(draft).is_ok())
    }

    pub fn metrics(&self) -> TextMetrics {
        self.view(|_, draft| TextMetrics::measure(draft))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::assessment::InMemoryAssessmentBackend;
    use crate::domain::assessment::FlowStatus;

    async fn started(backend: &Arc<InMemoryAssessmentBackend>) -> TextFlow {
        let flow = TextFlow::from_api(backend.clone());
        flow.start().await.unwrap();
        flow
    }

    #[tokio::test]
    async fn text_flow_is_ready_immediately() {
        let backend = Arc::new(InMemoryAssessmentBackend::new());
        let flow = started(&backend).await;
        assert_eq!(flow.status(), FlowStatus::Ready);
        assert!(!flow.can_submit());
    }

    #[tokio::test]
    async fn ninety_nine_characters_are_rejected_locally() {
        let backend = Arc::new(InMemoryAssessmentBackend::new());
        let flow = started(&backend).await;
        flow.set_text("x".repeat(99)).unwrap();

        assert!(!flow.can_submit());
        let err = flow.submit().await.unwrap_err();

        assert!(matches!(
            err,
            FlowError::Validation(ValidationError::TooShort { actual: 99, .. })
        ));
        assert_eq!(
            flow.error_message().as_deref(),
            Some("Please provide at least 100 characters for accurate analysis.")
        );
        assert_eq!(backend.submit_calls(), 0);
    }

    #[tokio::test]
    async fn one_hundred_characters_are_accepted() {
        let backend = Arc::new(InMemoryAssessmentBackend::new());
        let flow = started(&backend).await;
        let text = "y".repeat(100);
        flow.set_text(text.clone()).unwrap();

        assert!(flow.can_submit());
        flow.submit().await.unwrap();
        assert_eq!(backend.last_input(), Some(text));
        assert_eq!(flow.status(), FlowStatus::Completed);
    }

    #[tokio::test]
    async fn surrounding_whitespace_does_not_count_toward_minimum() {
        let backend = Arc::new(InMemoryAssessmentBackend::new());
        let flow = started(&backend).await;

        flow.set_text(" ".repeat(150)).unwrap();
        assert!(!flow.can_submit());
        assert!(matches!(
            flow.submit().await,
            Err(FlowError::Validation(ValidationError::EmptyField { .. }))
        ));

        flow.set_text(format!("{}{}", "z".repeat(60), " ".repeat(40))).unwrap();
        assert!(!flow.can_submit());
        flow.set_text(format!("{}{}", "z".repeat(10), " ".repeat(90))).unwrap();
        assert!(matches!(
            flow.submit().await,
            Err(FlowError::Validation(ValidationError::TooShort { .. }))
        ));
        assert_eq!(backend.submit_calls(), 0);

        flow.set_text(format!("  {}\n", "z".repeat(100))).unwrap();
        assert!(flow.can_submit());
        flow.submit().await.unwrap();
    }

    #[tokio::test]
    async fn failure_preserves_text() {
        let backend = Arc::new(InMemoryAssessmentBackend::new());
        let flow = started(&backend).await;
        flow.use_sample_text().unwrap();
        backend.fail_with(ClientError::network("connection reset"));

        assert!(flow.submit().await.is_err());
        assert_eq!(flow.status(), FlowStatus::Ready);
        assert_eq!(flow.text(), SAMPLE_TEXT);
    }

    #[test]
    fn metrics_grade_length() {
        assert_eq!(TextMetrics::measure("two words").words, 2);
        assert_eq!(TextStrength::for_length(99), TextStrength::Insufficient);
        assert_eq!(TextStrength::for_length(100), TextStrength::Minimum);
        assert_eq!(TextStrength::for_length(499), TextStrength::Minimum);
        assert_eq!(TextStrength::for_length(500), TextStrength::Recommended);
        assert_eq!(
            TextMetrics::measure(SAMPLE_TEXT).strength,
            TextStrength::Recommended
        );
    }

    #[test]
    fn characters_not_bytes() {
        assert_eq!(TextMetrics::measure("héllo").characters, 5);
    }
}
