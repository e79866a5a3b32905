//! Application layer - Session, flows, results, and navigation.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Nothing here talks HTTP directly; everything goes through `ports`.

pub mod flow;
mod result_service;
mod route_guard;
mod session_context;

pub use flow::{
    AssessmentStrategy, FlowController, FlowError, QuestionnaireFlow, TextFlow, TwitterFlow,
};
pub use result_service::{
    AllHistories, DownloadReportCommand, DownloadReportError, DownloadReportHandler, ResultService,
};
pub use route_guard::{GuardDecision, Redirect, Route, RouteGuard};
pub use session_context::{AuthOutcome, SessionContext};
