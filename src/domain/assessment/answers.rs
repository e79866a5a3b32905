//! Questionnaire answer sets.
//!
//! An [`AnswerSet`] maps question positions to chosen labels. It is only
//! submittable once every position `0..len` carries a label drawn from that
//! question's own choices.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{Question, QuestionId};
use crate::domain::foundation::ValidationError;

/// Wire form of a single answer: `{questionId, choice}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedAnswer {
    pub question_id: QuestionId,
    pub choice: String,
}

/// Answers recorded so far, keyed by question position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerSet {
    answers: BTreeMap<usize, String>,
}

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the chosen label for a question, replacing any earlier choice.
    pub fn record(
        &mut self,
        questions: &[Question],
        index: usize,
        label: impl Into<String>,
    ) -> Result<(), ValidationError> {
        let label = label.into();
        let question = questions.get(index).ok_or_else(|| {
            ValidationError::out_of_range(
                "question_index",
                0,
                questions.len() as i64 - 1,
                index as i64,
            )
        })?;
        if !question.has_choice(&label) {
            return Err(ValidationError::UnknownChoice { index, label });
        }
        self.answers.insert(index, label);
        Ok(())
    }

    /// The label chosen for a question, if any.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.answers.get(&index).map(String::as_str)
    }

    /// Number of answered questions.
    pub fn answered(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    /// First position in `0..total` that has no answer.
    pub fn first_unanswered(&self, total: usize) -> Option<usize> {
        (0..total).find(|i| !self.answers.contains_key(i))
    }

    /// Returns true if every question has an answer.
    pub fn is_complete(&self, total: usize) -> bool {
        self.first_unanswered(total).is_none()
    }

    /// Builds the ordered wire payload.
    ///
    /// Fails with [`ValidationError::Unanswered`] naming the first gap, or
    /// [`ValidationError::UnknownChoice`] if a recorded label no longer belongs
    /// to its question.
    pub fn to_submission(&self, questions: &[Question]) -> Result<Vec<SubmittedAnswer>, ValidationError> {
        if let Some(index) = self.first_unanswered(questions.len()) {
            return Err(ValidationError::Unanswered { index });
        }

        questions
            .iter()
            .enumerate()
            .map(|(index, question)| {
                let label = self
                    .answers
                    .get(&index)
                    .ok_or(ValidationError::Unanswered { index })?;
                if !question.has_choice(label) {
                    return Err(ValidationError::UnknownChoice {
                        index,
                        label: label.clone(),
                    });
                }
                Ok(SubmittedAnswer {
                    question_id: question.id,
                    choice: label.clone(),
                })
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.answers.clear();
    }
}
