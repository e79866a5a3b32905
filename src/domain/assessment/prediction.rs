//! Predictions returned by the backend.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{AssessmentMode, Dimension, InsightBundle, MbtiType};
use crate::domain::foundation::{PredictionId, Timestamp, ValidationError};

/// Per-dimension confidence, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceScores {
    #[serde(rename = "IE")]
    ie: f64,
    #[serde(rename = "NS")]
    ns: f64,
    #[serde(rename = "TF")]
    tf: f64,
    #[serde(rename = "JP")]
    jp: f64,
}

impl ConfidenceScores {
    /// Creates scores, rejecting any value outside `[0, 1]`.
    pub fn new(ie: f64, ns: f64, tf: f64, jp: f64) -> Result<Self, ValidationError> {
        for (dimension, value) in Dimension::ALL.iter().zip([ie, ns, tf, jp]) {
            if !(0.0..=1.0).contains(&value) {
                return Err(ValidationError::invalid_format(
                    format!("confidence.{}", dimension),
                    format!("{} is outside [0, 1]", value),
                ));
            }
        }
        Ok(Self { ie, ns, tf, jp })
    }

    /// Raw score for a dimension.
    pub fn get(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::IE => self.ie,
            Dimension::NS => self.ns,
            Dimension::TF => self.tf,
            Dimension::JP => self.jp,
        }
    }

    /// Score as a whole-number percentage.
    pub fn percent(&self, dimension: Dimension) -> u8 {
        (self.get(dimension).clamp(0.0, 1.0) * 100.0).round() as u8
    }
}

/// Where a Twitter analysis got its tweets from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DataSource {
    /// Live Twitter API.
    TwitterApi,
    /// Built-in demo profiles.
    MockApi,
    Other(String),
}

impl DataSource {
    pub fn as_str(&self) -> &str {
        match self {
            DataSource::TwitterApi => "twitter_api_real",
            DataSource::MockApi => "mock_api",
            DataSource::Other(raw) => raw,
        }
    }

    /// Short label for report summaries.
    pub fn label(&self) -> &str {
        match self {
            DataSource::TwitterApi => "Live Twitter data",
            DataSource::MockApi => "Demo profile",
            DataSource::Other(raw) => raw,
        }
    }
}

impl From<String> for DataSource {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "twitter_api_real" => DataSource::TwitterApi,
            "mock_api" => DataSource::MockApi,
            _ => DataSource::Other(raw),
        }
    }
}

impl From<DataSource> for String {
    fn from(source: DataSource) -> Self {
        source.as_str().to_string()
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the prediction was computed from. Every field depends on the mode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputMetadata {
    pub timestamp: Option<Timestamp>,
    pub text_length: Option<usize>,
    pub text_snippet: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub username: Option<String>,
    pub tweet_count: Option<usize>,
    pub total_characters: Option<usize>,
    pub source: Option<DataSource>,
}

impl InputMetadata {
    /// Characters analyzed, whichever field the mode reports.
    pub fn characters(&self) -> Option<usize> {
        self.text_length.or(self.total_characters)
    }
}

/// A stored MBTI prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub id: PredictionId,
    pub mode: AssessmentMode,
    pub mbti_type: MbtiType,
    pub confidence: ConfidenceScores,
    #[serde(default)]
    pub metadata: InputMetadata,
}

/// Result of a successful submit: the new id plus everything needed to render.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub prediction_id: PredictionId,
    pub prediction: Prediction,
    pub insights: InsightBundle,
}

/// Result of fetching a prediction by id.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionReport {
    pub prediction: Prediction,
    pub insights: InsightBundle,
}

impl From<Submission> for PredictionReport {
    fn from(submission: Submission) -> Self {
        Self {
            prediction: submission.prediction,
            insights: submission.insights,
        }
    }
}
