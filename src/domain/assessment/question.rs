//! Questionnaire questions as delivered by the backend.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Dimension;

/// Backend identifier of a question (1-based in the shipped question bank).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(pub u32);

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One selectable option of a question.
///
/// The backend also sends scoring data (`value`, `weight`); the client never
/// needs it, so it is not modelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub label: String,
    pub text: String,
}

/// A scenario question probing one MBTI dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub dimension: Dimension,
    pub scenario: String,
    pub choices: Vec<Choice>,
}

impl Question {
    /// Returns true if `label` is one of this question's own choices.
    pub fn has_choice(&self, label: &str) -> bool {
        self.choices.iter().any(|c| c.label == label)
    }

    /// Looks up a choice by label.
    pub fn choice(&self, label: &str) -> Option<&Choice> {
        self.choices.iter().find(|c| c.label == label)
    }
}
