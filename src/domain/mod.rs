//! Domain layer containing client-side rules and types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, state machine)
//! - `session` - Signed-in identity, credential checks, auth lifecycle
//! - `assessment` - Questions, answers, predictions, insights, history
//! - `report` - Report view and the PDF page plan

pub mod assessment;
pub mod foundation;
pub mod report;
pub mod session;
