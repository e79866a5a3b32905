//! Assessment modes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// The three ways a user can be assessed.
///
/// Each mode has its own backend route prefix and its own history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentMode {
    Questionnaire,
    Text,
    Twitter,
}

impl AssessmentMode {
    /// All modes, in the order they appear on the home screen.
    pub const ALL: [AssessmentMode; 3] = [
        AssessmentMode::Questionnaire,
        AssessmentMode::Text,
        AssessmentMode::Twitter,
    ];

    /// Route and API path segment for this mode.
    pub fn path_segment(&self) -> &'static str {
        match self {
            AssessmentMode::Questionnaire => "questionnaire",
            AssessmentMode::Text => "text",
            AssessmentMode::Twitter => "twitter",
        }
    }

    /// Human-readable name.
    pub fn label(&self) -> &'static str {
        match self {
            AssessmentMode::Questionnaire => "Questionnaire",
            AssessmentMode::Text => "Text Analysis",
            AssessmentMode::Twitter => "Twitter Analysis",
        }
    }
}

impl fmt::Display for AssessmentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_segment())
    }
}

impl FromStr for AssessmentMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "questionnaire" | "quiz" => Ok(AssessmentMode::Questionnaire),
            "text" => Ok(AssessmentMode::Text),
            "twitter" => Ok(AssessmentMode::Twitter),
            other => Err(ValidationError::invalid_format(
                "mode",
                format!("unknown assessment mode '{}'", other),
            )),
        }
    }
}
