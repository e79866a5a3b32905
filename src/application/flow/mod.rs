//! Assessment flow controllers.
//!
//! One generic [`FlowController`] owns the lifecycle; each mode plugs in an
//! [`AssessmentStrategy`] describing what it loads, edits, and submits.

mod controller;
mod questionnaire;
mod text;
mod twitter;

pub use controller::{AssessmentStrategy, FlowController, FlowError};
pub use questionnaire::{Progress, QuestionnaireDraft, QuestionnaireFlow, QuestionnaireStrategy};
pub use text::{
    TextFlow, TextMetrics, TextStrategy, TextStrength, MIN_TEXT_CHARS, RECOMMENDED_TEXT_CHARS,
    SAMPLE_TEXT,
};
pub use twitter::{normalize_username, TwitterFlow, TwitterStrategy};
