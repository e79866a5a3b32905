//! Assessment backend adapters for tests and offline runs.

mod in_memory;

pub use in_memory::{sample_insights, sample_questions, InMemoryAssessmentBackend};
