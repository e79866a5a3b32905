//! In-memory assessment backend for testing.
//!
//! Implements every assessment port against local state so flow controllers
//! and result services can be exercised without a server.
//!
//! # Panics
//!
//! Methods unwrap their internal locks and will panic if one is poisoned.
//! This adapter is for tests and offline demos only.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::domain::assessment::{
    AssessmentMode, Choice, Compatibility, CompatibilityDetail, ConfidenceScores, DataSource,
    Dimension, InputMetadata, InsightBundle, MbtiType, Prediction, PredictionReport, Question,
    QuestionId, Submission, SubmittedAnswer,
};
use crate::domain::foundation::{ClientError, PredictionId, Timestamp};
use crate::ports::{QuestionnaireApi, ResultReader, TextApi, TwitterApi};

const SNIPPET_CHARS: usize = 100;
const DEMO_TWEET_COUNT: usize = 50;

/// In-memory assessment backend.
///
/// Every submission is stored and can be read back through `ResultReader`.
#[derive(Debug)]
pub struct InMemoryAssessmentBackend {
    questions: Vec<Question>,
    usernames: Vec<String>,
    mbti_type: MbtiType,
    confidence: ConfidenceScores,
    insights: InsightBundle,
    stored: RwLock<HashMap<String, PredictionReport>>,
    force_error: RwLock<Option<ClientError>>,
    usernames_error: RwLock<Option<ClientError>>,
    gate: RwLock<Option<Arc<Notify>>>,
    last_answers: RwLock<Vec<SubmittedAnswer>>,
    last_input: RwLock<Option<String>>,
    submit_calls: AtomicUsize,
    next_id: AtomicUsize,
}

impl Default for InMemoryAssessmentBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryAssessmentBackend {
    /// Creates a backend with the sample question bank and INTJ insights.
    pub fn new() -> Self {
        let mbti_type = MbtiType::parse("INTJ").unwrap();
        Self {
            questions: sample_questions(),
            usernames: vec!["elonmusk".into(), "naval".into(), "paulg".into()],
            mbti_type,
            confidence: ConfidenceScores::new(0.72, 0.65, 0.81, 0.58).unwrap(),
            insights: sample_insights(),
            stored: RwLock::new(HashMap::new()),
            force_error: RwLock::new(None),
            usernames_error: RwLock::new(None),
            gate: RwLock::new(None),
            last_answers: RwLock::new(Vec::new()),
            last_input: RwLock::new(None),
            submit_calls: AtomicUsize::new(0),
            next_id: AtomicUsize::new(0),
        }
    }

    // === Builders ===

    pub fn with_questions(mut self, questions: Vec<Question>) -> Self {
        self.questions = questions;
        self
    }

    pub fn with_usernames(mut self, usernames: Vec<String>) -> Self {
        self.usernames = usernames;
        self
    }

    pub fn with_insights(mut self, insights: InsightBundle) -> Self {
        self.insights = insights;
        self
    }

    pub fn with_result(mut self, mbti_type: MbtiType, confidence: ConfidenceScores) -> Self {
        self.mbti_type = mbti_type;
        self.confidence = confidence;
        self
    }

    /// Forces every call to return the specified error.
    pub fn with_error(self, error: ClientError) -> Self {
        *self.force_error.write().unwrap() = Some(error);
        self
    }

    /// Makes only the username suggestion call fail.
    pub fn with_usernames_error(self, error: ClientError) -> Self {
        *self.usernames_error.write().unwrap() = Some(error);
        self
    }

    /// Stores a prediction so it shows up in history and result lookups.
    pub fn with_stored(self, prediction: Prediction) -> Self {
        self.store(PredictionReport {
            prediction,
            insights: self.insights.clone(),
        });
        self
    }

    // === Test Helpers ===

    /// Makes every later call fail until `clear_error`.
    pub fn fail_with(&self, error: ClientError) {
        *self.force_error.write().unwrap() = Some(error);
    }

    pub fn clear_error(&self) {
        *self.force_error.write().unwrap() = None;
    }

    /// Holds every submission until the returned handle is notified once per call.
    pub fn hold_submissions(&self) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        *self.gate.write().unwrap() = Some(notify.clone());
        notify
    }

    pub fn submit_calls(&self) -> usize {
        self.submit_calls.load(Ordering::SeqCst)
    }

    /// Answers from the most recent questionnaire submission.
    pub fn last_answers(&self) -> Vec<SubmittedAnswer> {
        self.last_answers.read().unwrap().clone()
    }

    /// Text or username from the most recent text/twitter submission.
    pub fn last_input(&self) -> Option<String> {
        self.last_input.read().unwrap().clone()
    }

    pub fn stored_count(&self) -> usize {
        self.stored.read().unwrap().len()
    }

    fn forced(&self) -> Result<(), ClientError> {
        match self.force_error.read().unwrap().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn store(&self, report: PredictionReport) {
        let key = storage_key(report.prediction.mode, &report.prediction.id);
        self.stored.write().unwrap().insert(key, report);
    }

    async fn submit(
        &self,
        mode: AssessmentMode,
        mut metadata: InputMetadata,
    ) -> Result<Submission, ClientError> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.gate.read().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.forced()?;

        metadata.timestamp = Some(Timestamp::now());
        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let id = PredictionId::new(format!("pred-{}", n)).unwrap();
        let prediction = Prediction {
            id: id.clone(),
            mode,
            mbti_type: self.mbti_type,
            confidence: self.confidence,
            metadata,
        };

        self.store(PredictionReport {
            prediction: prediction.clone(),
            insights: self.insights.clone(),
        });

        Ok(Submission {
            prediction_id: id,
            prediction,
            insights: self.insights.clone(),
        })
    }
}

fn storage_key(mode: AssessmentMode, id: &PredictionId) -> String {
    format!("{}/{}", mode.path_segment(), id.as_str())
}

#[async_trait]
impl QuestionnaireApi for InMemoryAssessmentBackend {
    async fn fetch_questions(&self) -> Result<Vec<Question>, ClientError> {
        self.forced()?;
        Ok(self.questions.clone())
    }

    async fn submit_answers(&self, answers: &[SubmittedAnswer]) -> Result<Submission, ClientError> {
        *self.last_answers.write().unwrap() = answers.to_vec();
        self.submit(AssessmentMode::Questionnaire, InputMetadata::default())
            .await
    }
}

#[async_trait]
impl TextApi for InMemoryAssessmentBackend {
    async fn submit_text(&self, text: &str) -> Result<Submission, ClientError> {
        *self.last_input.write().unwrap() = Some(text.to_string());
        let metadata = InputMetadata {
            text_length: Some(text.chars().count()),
            text_snippet: Some(text.chars().take(SNIPPET_CHARS).collect()),
            keywords: vec!["planning".into(), "systems".into()],
            ..InputMetadata::default()
        };
        self.submit(AssessmentMode::Text, metadata).await
    }
}

#[async_trait]
impl TwitterApi for InMemoryAssessmentBackend {
    async fn available_usernames(&self) -> Result<Vec<String>, ClientError> {
        if let Some(error) = self.usernames_error.read().unwrap().clone() {
            return Err(error);
        }
        self.forced()?;
        Ok(self.usernames.clone())
    }

    async fn analyze(&self, username: &str) -> Result<Submission, ClientError> {
        *self.last_input.write().unwrap() = Some(username.to_string());
        let metadata = InputMetadata {
            username: Some(username.to_string()),
            tweet_count: Some(DEMO_TWEET_COUNT),
            total_characters: Some(DEMO_TWEET_COUNT * 120),
            source: Some(DataSource::MockApi),
            ..InputMetadata::default()
        };
        self.submit(AssessmentMode::Twitter, metadata).await
    }
}

#[async_trait]
impl ResultReader for InMemoryAssessmentBackend {
    async fn fetch_result(
        &self,
        mode: AssessmentMode,
        id: &PredictionId,
    ) -> Result<PredictionReport, ClientError> {
        self.forced()?;
        self.stored
            .read()
            .unwrap()
            .get(&storage_key(mode, id))
            .cloned()
            .ok_or_else(|| ClientError::not_found("Result not found"))
    }

    async fn fetch_history(&self, mode: AssessmentMode) -> Result<Vec<Prediction>, ClientError> {
        self.forced()?;
        Ok(self
            .stored
            .read()
            .unwrap()
            .values()
            .filter(|report| report.prediction.mode == mode)
            .map(|report| report.prediction.clone())
            .collect())
    }
}

/// One question per dimension, two choices each.
pub fn sample_questions() -> Vec<Question> {
    let scenarios = [
        (Dimension::IE, "After a long week, how do you recharge?", "Host a dinner with friends", "Spend a quiet evening alone"),
        (Dimension::NS, "When learning something new, you prefer...", "Concrete examples and steps", "The big picture and theory first"),
        (Dimension::TF, "A friend asks for feedback on a weak plan.", "Point out the flaws directly", "Encourage them and soften the critique"),
        (Dimension::JP, "Planning a trip, you usually...", "Book everything in advance", "Decide as you go"),
    ];

    scenarios
        .iter()
        .enumerate()
        .map(|(i, (dimension, scenario, a, b))| Question {
            id: QuestionId(i as u32 + 1),
            dimension: *dimension,
            scenario: scenario.to_string(),
            choices: vec![
                Choice { label: "A".into(), text: a.to_string() },
                Choice { label: "B".into(), text: b.to_string() },
            ],
        })
        .collect()
}

/// A complete insight bundle, enough for every report page.
pub fn sample_insights() -> InsightBundle {
    let mut details = std::collections::BTreeMap::new();
    details.insert(
        "ENFP".to_string(),
        CompatibilityDetail {
            score: Some(92.0),
            why: Some("Their enthusiasm balances your focus.".into()),
            challenges: Some("Different pacing on decisions.".into()),
        },
    );

    InsightBundle {
        title: Some("The Architect".into()),
        percentage: Some("2-4%".into()),
        description: Some("Imaginative and strategic thinkers with a plan for everything.".into()),
        strengths: vec!["Strategic thinking".into(), "Independence".into()],
        weaknesses: vec!["Can seem aloof".into()],
        careers: vec!["Software architect".into(), "Scientist".into()],
        study_habits: vec!["Prefers self-directed study".into()],
        compatibility: Some(Compatibility {
            best_matches: vec!["ENFP".into(), "ENTP".into()],
            details,
        }),
        growth_tips: vec!["Share your reasoning early".into()],
        famous_people: vec!["Isaac Newton".into(), "Michelle Obama".into()],
    }
}
