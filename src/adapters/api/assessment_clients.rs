//! HTTP implementations of the assessment ports.
//!
//! Each mode lives under its own path segment (`questionnaire`, `text`,
//! `twitter`) and shares the result/history endpoints.

use async_trait::async_trait;

use super::client::{ApiClient, Auth};
use super::dto::{
    AnswersRequest, HistoryResponse, QuestionsResponse, ResultResponse, SubmitResponse,
    TextRequest, TwitterRequest, UsernamesResponse,
};
use crate::domain::assessment::{
    AssessmentMode, Prediction, PredictionReport, Question, Submission, SubmittedAnswer,
};
use crate::domain::foundation::{ClientError, PredictionId};
use crate::ports::{QuestionnaireApi, ResultReader, TextApi, TwitterApi};

fn endpoint(mode: AssessmentMode, tail: &str) -> String {
    format!("{}/{}", mode.path_segment(), tail)
}

/// `/questionnaire/*`
#[derive(Debug, Clone)]
pub struct QuestionnaireClient {
    api: ApiClient,
}

impl QuestionnaireClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl QuestionnaireApi for QuestionnaireClient {
    async fn fetch_questions(&self) -> Result<Vec<Question>, ClientError> {
        let response: QuestionsResponse = self
            .api
            .get_json(&endpoint(AssessmentMode::Questionnaire, "questions"), Auth::Session)
            .await?;
        tracing::debug!(count = response.questions.len(), "Questions loaded");
        Ok(response.questions)
    }

    async fn submit_answers(&self, answers: &[SubmittedAnswer]) -> Result<Submission, ClientError> {
        let response: SubmitResponse = self
            .api
            .post_json(
                &endpoint(AssessmentMode::Questionnaire, "predict"),
                &AnswersRequest { answers },
                Auth::Session,
            )
            .await?;
        response.into_submission(AssessmentMode::Questionnaire)
    }
}

/// `/text/*`
#[derive(Debug, Clone)]
pub struct TextClient {
    api: ApiClient,
}

impl TextClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl TextApi for TextClient {
    async fn submit_text(&self, text: &str) -> Result<Submission, ClientError> {
        let response: SubmitResponse = self
            .api
            .post_json(&endpoint(AssessmentMode::Text, "predict"), &TextRequest { text }, Auth::Session)
            .await?;
        response.into_submission(AssessmentMode::Text)
    }
}

/// `/twitter/*`
#[derive(Debug, Clone)]
pub struct TwitterClient {
    api: ApiClient,
}

impl TwitterClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl TwitterApi for TwitterClient {
    async fn available_usernames(&self) -> Result<Vec<String>, ClientError> {
        let response: UsernamesResponse = self
            .api
            .get_json(&endpoint(AssessmentMode::Twitter, "available-usernames"), Auth::Public)
            .await?;
        Ok(response.usernames)
    }

    async fn analyze(&self, username: &str) -> Result<Submission, ClientError> {
        let response: SubmitResponse = self
            .api
            .post_json(
                &endpoint(AssessmentMode::Twitter, "analyze"),
                &TwitterRequest { username },
                Auth::Session,
            )
            .await?;
        response.into_submission(AssessmentMode::Twitter)
    }
}

/// `/{mode}/result/{id}` and `/{mode}/history`
#[derive(Debug, Clone)]
pub struct HttpResultReader {
    api: ApiClient,
}

impl HttpResultReader {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl ResultReader for HttpResultReader {
    async fn fetch_result(
        &self,
        mode: AssessmentMode,
        id: &PredictionId,
    ) -> Result<PredictionReport, ClientError> {
        let path = endpoint(mode, &format!("result/{}", id.as_str()));
        let response: ResultResponse = self.api.get_json(&path, Auth::Session).await?;
        response.into_report(mode)
    }

    async fn fetch_history(&self, mode: AssessmentMode) -> Result<Vec<Prediction>, ClientError> {
        let response: HistoryResponse = self
            .api
            .get_json(&endpoint(mode, "history"), Auth::Session)
            .await?;
        response
            .predictions
            .into_iter()
            .map(|dto| dto.into_prediction(mode))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_use_mode_segment() {
        assert_eq!(endpoint(AssessmentMode::Questionnaire, "predict"), "questionnaire/predict");
        assert_eq!(endpoint(AssessmentMode::Text, "history"), "text/history");
        assert_eq!(
            endpoint(AssessmentMode::Twitter, "available-usernames"),
            "twitter/available-usernames"
        );
    }
}
