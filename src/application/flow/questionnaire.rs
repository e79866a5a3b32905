//! Questionnaire flow: one question at a time, submitted as a full answer list.

use async_trait::async_trait;
use std::sync::Arc;

use super::controller::{AssessmentStrategy, FlowController, FlowError};
use crate::domain::assessment::{AnswerSet, AssessmentMode, Question, Submission, SubmittedAnswer};
use crate::domain::foundation::{ClientError, ValidationError};
use crate::ports::QuestionnaireApi;

/// Answers plus the position of the question on screen.
#[derive(Debug, Clone, Default)]
pub struct QuestionnaireDraft {
    pub answers: AnswerSet,
    pub cursor: usize,
}

/// Where the user is in the questionnaire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// 1-based position of the visible question.
    pub current: usize,
    pub total: usize,
    pub answered: usize,
}

impl Progress {
    /// Share of questions answered, 0-100.
    pub fn percent_answered(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        ((self.answered * 100) / self.total) as u8
    }
}

pub struct QuestionnaireStrategy {
    api: Arc<dyn QuestionnaireApi>,
}

impl QuestionnaireStrategy {
    pub fn new(api: Arc<dyn QuestionnaireApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl AssessmentStrategy for QuestionnaireStrategy {
    type Input = Vec<Question>;
    type Draft = QuestionnaireDraft;
    type Payload = Vec<SubmittedAnswer>;

    fn mode(&self) -> AssessmentMode {
        AssessmentMode::Questionnaire
    }

    async fn fetch_input(&self) -> Result<Vec<Question>, ClientError> {
        let questions = self.api.fetch_questions().await?;
        if questions.is_empty() {
            return Err(ClientError::Decode("questionnaire has no questions".to_string()));
        }
        tracing::debug!(count = questions.len(), "Loaded questions");
        Ok(questions)
    }

    fn validate(
        &self,
        questions: &Vec<Question>,
        draft: &QuestionnaireDraft,
    ) -> Result<Vec<SubmittedAnswer>, ValidationError> {
        draft.answers.to_submission(questions)
    }

    async fn submit(&self, answers: Vec<SubmittedAnswer>) -> Result<Submission, ClientError> {
        self.api.submit_answers(&answers).await
    }

    fn recover(&self, draft: &mut QuestionnaireDraft, error: &ValidationError) {
        if let ValidationError::Unanswered { index } = error {
            draft.cursor = *index;
        }
    }

    fn on_success(&self, draft: &mut QuestionnaireDraft) {
        draft.answers.clear();
    }
}

pub type QuestionnaireFlow = FlowController<QuestionnaireStrategy>;

impl FlowController<QuestionnaireStrategy> {
    pub fn from_api(api: Arc<dyn QuestionnaireApi>) -> Self {
        Self::new(QuestionnaireStrategy::new(api))
    }

    /// Records the chosen label for question `index`. The cursor stays put.
    pub fn answer(&self, index: usize, label: &str) -> Result<(), FlowError> {
        self.edit(|questions, draft| draft.answers.record(questions, index, label))
    }

    /// Moves forward one question; returns the new cursor.
    pub fn next(&self) -> Result<usize, FlowError> {
        self.edit(|questions, draft| {
            let last = questions.len().saturating_sub(1);
            draft.cursor = (draft.cursor + 1).min(last);
            Ok(draft.cursor)
        })
    }

    /// Moves back one question; returns the new cursor.
    pub fn previous(&self) -> Result<usize, FlowError> {
        self.edit(|_, draft| {
            draft.cursor = draft.cursor.saturating_sub(1);
            Ok(draft.cursor)
        })
    }

    pub fn can_go_next(&self) -> bool {
        self.view(|questions, draft| {
            questions.is_some_and(|q| draft.cursor + 1 < q.len())
        })
    }

    pub fn can_go_previous(&self) -> bool {
        self.view(|questions, draft| questions.is_some() && draft.cursor > 0)
    }

    pub fn cursor(&self) -> usize {
        self.view(|_, draft| draft.cursor)
    }

    pub fn current_question(&self) -> Option<Question> {
        self.view(|questions, draft| questions.and_then(|q| q.get(draft.cursor).cloned()))
    }

    pub fn is_last_question(&self) -> bool {
        self.view(|questions, draft| {
            questions.is_some_and(|q| !q.is_empty() && draft.cursor == q.len() - 1)
        })
    }

    pub fn all_answered(&self) -> bool {
        self.view(|questions, draft| {
            questions.is_some_and(|q| draft.answers.is_complete(q.len()))
        })
    }

    /// Label chosen for question `index`, if any.
    pub fn answer_at(&self, index: usize) -> Option<String> {
        self.view(|_, draft| draft.answers.get(index).map(str::to_string))
    }

    pub fn answers(&self) -> AnswerSet {
        self.view(|_, draft| draft.answers.clone())
    }

    pub fn questions(&self) -> Vec<Question> {
        self.view(|questions, _| questions.cloned().unwrap_or_default())
    }

    pub fn progress(&self) -> Progress {
        self.view(|questions, draft| {
            let total = questions.map_or(0, Vec::len);
            Progress {
                current: if total == 0 { 0 } else { draft.cursor + 1 },
                total,
                answered: draft.answers.answered(),
            }
        })
    }
}
