//! Wire types for the backend's JSON contract and their domain conversions.

use serde::{Deserialize, Serialize};

use crate::domain::assessment::{
    AssessmentMode, ConfidenceScores, DataSource, Dimension, InputMetadata, InsightBundle,
    MbtiType, Prediction, PredictionReport, Question, Submission, SubmittedAnswer,
};
use crate::domain::foundation::{ClientError, PredictionId, Timestamp, UserId};
use crate::domain::session::{Session, UserProfile};

/// Error payload. The API uses `error`; the JWT layer answers with `msg`.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    error: Option<String>,
    msg: Option<String>,
    message: Option<String>,
}

impl ErrorBody {
    pub fn into_message(self) -> Option<String> {
        self.error
            .or(self.msg)
            .or(self.message)
            .filter(|m| !m.trim().is_empty())
    }
}

// ───────────────────────────────────────────────────────────────
// Auth
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct SignupRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct UserDto {
    #[serde(alias = "_id")]
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: String,
}

impl UserDto {
    pub fn into_profile(self) -> Result<UserProfile, ClientError> {
        Ok(UserProfile {
            id: UserId::new(self.id).map_err(|e| ClientError::Decode(e.to_string()))?,
            email: self.email,
            name: self.name,
        })
    }
}

#[derive(Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserDto,
}

impl AuthResponse {
    pub fn into_session(self) -> Result<Session, ClientError> {
        if self.token.trim().is_empty() {
            return Err(ClientError::Decode("auth response has an empty token".to_string()));
        }
        Ok(Session::new(self.user.into_profile()?, self.token))
    }
}

#[derive(Debug, Deserialize)]
pub struct MeResponse {
    pub user: UserDto,
}

// ───────────────────────────────────────────────────────────────
// Assessments
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct QuestionsResponse {
    #[serde(default)]
    pub questions: Vec<Question>,
}

#[derive(Debug, Serialize)]
pub struct AnswersRequest<'a> {
    pub answers: &'a [SubmittedAnswer],
}

#[derive(Debug, Serialize)]
pub struct TextRequest<'a> {
    pub text: &'a str,
}

#[derive(Debug, Serialize)]
pub struct TwitterRequest<'a> {
    pub username: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct UsernamesResponse {
    #[serde(default)]
    pub usernames: Vec<String>,
}

/// Fields shared by submit responses and stored predictions.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataDto {
    pub timestamp: Option<Timestamp>,
    pub text_length: Option<usize>,
    pub text_snippet: Option<String>,
    pub keywords: Option<Vec<String>>,
    pub username: Option<String>,
    pub tweet_count: Option<usize>,
    pub total_characters: Option<usize>,
    pub source: Option<String>,
}

impl From<MetadataDto> for InputMetadata {
    fn from(dto: MetadataDto) -> Self {
        InputMetadata {
            timestamp: dto.timestamp,
            text_length: dto.text_length,
            text_snippet: dto.text_snippet,
            keywords: dto.keywords.unwrap_or_default(),
            username: dto.username,
            tweet_count: dto.tweet_count,
            total_characters: dto.total_characters,
            source: dto.source.map(DataSource::from),
        }
    }
}

/// Response to any submit call.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub prediction_id: String,
    pub mbti_type: String,
    pub confidence: ConfidenceScores,
    #[serde(default)]
    pub insights: Option<InsightBundle>,
    #[serde(flatten)]
    pub metadata: MetadataDto,
}

impl SubmitResponse {
    pub fn into_submission(self, mode: AssessmentMode) -> Result<Submission, ClientError> {
        let id = decode_id(self.prediction_id)?;
        let prediction = Prediction {
            id: id.clone(),
            mode,
            mbti_type: decode_type(&self.mbti_type)?,
            confidence: checked_confidence(self.confidence)?,
            metadata: self.metadata.into(),
        };
        Ok(Submission {
            prediction_id: id,
            prediction,
            insights: self.insights.unwrap_or_default(),
        })
    }
}

/// A stored prediction as returned by result and history endpoints.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionDto {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub mbti_type: String,
    pub confidence: ConfidenceScores,
    #[serde(flatten)]
    pub metadata: MetadataDto,
}

impl PredictionDto {
    pub fn into_prediction(self, mode: AssessmentMode) -> Result<Prediction, ClientError> {
        Ok(Prediction {
            id: decode_id(self.id)?,
            mode,
            mbti_type: decode_type(&self.mbti_type)?,
            confidence: checked_confidence(self.confidence)?,
            metadata: self.metadata.into(),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct ResultResponse {
    pub prediction: PredictionDto,
    #[serde(default)]
    pub insights: Option<InsightBundle>,
}

impl ResultResponse {
    pub fn into_report(self, mode: AssessmentMode) -> Result<PredictionReport, ClientError> {
        Ok(PredictionReport {
            prediction: self.prediction.into_prediction(mode)?,
            insights: self.insights.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct HistoryResponse {
    #[serde(default)]
    pub predictions: Vec<PredictionDto>,
}

fn decode_id(raw: String) -> Result<PredictionId, ClientError> {
    PredictionId::new(raw).map_err(|e| ClientError::Decode(e.to_string()))
}

fn decode_type(raw: &str) -> Result<MbtiType, ClientError> {
    MbtiType::parse(raw).map_err(|e| ClientError::Decode(e.to_string()))
}

fn checked_confidence(scores: ConfidenceScores) -> Result<ConfidenceScores, ClientError> {
    let [ie, ns, tf, jp] = Dimension::ALL.map(|d| scores.get(d));
    ConfidenceScores::new(ie, ns, tf, jp).map_err(|e| ClientError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn error_body_prefers_error_then_msg() {
        let body: ErrorBody = serde_json::from_value(json!({"msg": "Token has expired"})).unwrap();
        assert_eq!(body.into_message().as_deref(), Some("Token has expired"));

        let body: ErrorBody =
            serde_json::from_value(json!({"error": "Result not found", "msg": "x"})).unwrap();
        assert_eq!(body.into_message().as_deref(), Some("Result not found"));

        let body: ErrorBody = serde_json::from_value(json!({"error": " "})).unwrap();
        assert_eq!(body.into_message(), None);
    }

    #[test]
    fn twitter_submit_response_keeps_metadata() {
        let response: SubmitResponse = serde_json::from_value(json!({
            "predictionId": "6530a1",
            "username": "naval",
            "mbtiType": "intj",
            "confidence": {"IE": 0.7, "NS": 0.8, "TF": 0.6, "JP": 0.55},
            "tweetCount": 48,
            "keywords": ["wealth", "leverage"],
            "source": "twitter_api_real",
            "profileInfo": {"followers": 1000},
            "insights": {"title": "The Architect"}
        }))
        .unwrap();

        let submission = response.into_submission(AssessmentMode::Twitter).unwrap();
        assert_eq!(submission.prediction_id.as_str(), "6530a1");
        assert_eq!(submission.prediction.mbti_type.to_string(), "INTJ");
        assert_eq!(submission.prediction.metadata.tweet_count, Some(48));
        assert_eq!(submission.prediction.metadata.source, Some(DataSource::TwitterApi));
        assert_eq!(submission.insights.title.as_deref(), Some("The Architect"));
    }

    #[test]
    fn stored_prediction_reads_mongo_id_and_http_date() {
        let dto: PredictionDto = serde_json::from_value(json!({
            "_id": "652f00",
            "userId": "u1",
            "mbtiType": "ENFP",
            "confidence": {"IE": 0.6, "NS": 0.7, "TF": 0.65, "JP": 0.8},
            "textLength": 812,
            "textSnippet": "I love meeting people",
            "timestamp": "Fri, 16 Oct 2026 10:30:00 GMT",
            "ml_enhanced": true
        }))
        .unwrap();

        let prediction = dto.into_prediction(AssessmentMode::Text).unwrap();
        assert_eq!(prediction.id.as_str(), "652f00");
        assert_eq!(prediction.metadata.text_length, Some(812));
        assert_eq!(
            prediction.metadata.timestamp.unwrap().date_label(),
            "2026-10-16"
        );
    }

    #[test]
    fn invalid_type_code_is_a_decode_error() {
        let dto: PredictionDto = serde_json::from_value(json!({
            "_id": "1",
            "mbtiType": "XXXX",
            "confidence": {"IE": 0.6, "NS": 0.7, "TF": 0.65, "JP": 0.8}
        }))
        .unwrap();
        assert!(matches!(
            dto.into_prediction(AssessmentMode::Text),
            Err(ClientError::Decode(_))
        ));
    }

    #[test]
    fn out_of_range_confidence_is_a_decode_error() {
        let dto: PredictionDto = serde_json::from_value(json!({
            "_id": "1",
            "mbtiType": "ISTJ",
            "confidence": {"IE": 1.6, "NS": 0.7, "TF": 0.65, "JP": 0.8}
        }))
        .unwrap();
        assert!(matches!(
            dto.into_prediction(AssessmentMode::Questionnaire),
            Err(ClientError::Decode(_))
        ));
    }

    #[test]
    fn auth_response_builds_session() {
        let response: AuthResponse = serde_json::from_value(json!({
            "token": "jwt",
            "user": {"id": "u1", "email": "a@b.io", "name": "Ada"}
        }))
        .unwrap();
        let session = response.into_session().unwrap();
        assert_eq!(session.user().name, "Ada");
        assert_eq!(session.user_id().as_str(), "u1");
    }
}
