//! Assessment API Ports - Submit inputs and read predictions back.
//!
//! One port per input style plus a shared reader. All calls are
//! authenticated except `TwitterApi::available_usernames`.
//!
//! Error contract shared by every method:
//! - `ClientError::Auth` on 401 (the credential source has already been told)
//! - `ClientError::NotFound` on 404
//! - `ClientError::Backend` with the backend's own message on other failures
//! - `ClientError::Network` when no response arrived

use async_trait::async_trait;

use crate::domain::assessment::{
    AssessmentMode, Prediction, PredictionReport, Question, Submission, SubmittedAnswer,
};
use crate::domain::foundation::{ClientError, PredictionId};

/// Questionnaire backend.
#[async_trait]
pub trait QuestionnaireApi: Send + Sync {
    /// The full question set, in display order.
    async fn fetch_questions(&self) -> Result<Vec<Question>, ClientError>;

    /// Submit a complete, ordered answer list.
    async fn submit_answers(&self, answers: &[SubmittedAnswer]) -> Result<Submission, ClientError>;
}

/// Free-text backend.
#[async_trait]
pub trait TextApi: Send + Sync {
    async fn submit_text(&self, text: &str) -> Result<Submission, ClientError>;
}

/// Twitter backend.
#[async_trait]
pub trait TwitterApi: Send + Sync {
    /// Demo handles the backend can analyze. Public endpoint.
    async fn available_usernames(&self) -> Result<Vec<String>, ClientError>;

    /// Analyze a handle (without the leading `@`).
    async fn analyze(&self, username: &str) -> Result<Submission, ClientError>;
}

/// Read access to stored predictions of any mode.
#[async_trait]
pub trait ResultReader: Send + Sync {
    async fn fetch_result(
        &self,
        mode: AssessmentMode,
        id: &PredictionId,
    ) -> Result<PredictionReport, ClientError>;

    /// All of the user's predictions for a mode, in backend order.
    async fn fetch_history(&self, mode: AssessmentMode) -> Result<Vec<Prediction>, ClientError>;
}
