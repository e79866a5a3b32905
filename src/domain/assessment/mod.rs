//! Assessment domain - questions, answers, predictions, and insights.

mod answers;
mod flow_status;
mod history;
mod insights;
mod mbti;
mod mode;
mod prediction;
mod question;

pub use answers::{AnswerSet, SubmittedAnswer};
pub use flow_status::FlowStatus;
pub use history::{HistoryStats, HistoryView};
pub use insights::{Compatibility, CompatibilityDetail, InsightBundle};
pub use mbti::{Dimension, MbtiType};
pub use mode::AssessmentMode;
pub use prediction::{
    ConfidenceScores, DataSource, InputMetadata, Prediction, PredictionReport, Submission,
};
pub use question::{Choice, Question, QuestionId};
