//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, timestamps, the state machine trait, and the error
//! types that form the vocabulary of the MindMorph client.

mod auth;
mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use auth::AuthError;
pub use errors::{ClientError, ErrorKind, ValidationError};
pub use ids::{PredictionId, UserId};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
