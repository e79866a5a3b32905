//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the application and the outside world. Adapters implement these ports.
//!
//! ## Backend Ports
//!
//! - `AuthGateway` - Login, signup, and current-user lookup
//! - `QuestionnaireApi`, `TextApi`, `TwitterApi` - Submit assessments
//! - `ResultReader` - Fetch predictions by id and list history
//!
//! ## Session Ports
//!
//! - `TokenStore` - Persist the session token across restarts
//! - `CredentialSource` - Supply bearer tokens and receive 401 notifications
//!
//! ## Export Ports
//!
//! - `ReportExporter` - Render a report as PDF, HTML, or Markdown
//! - `DownloadSink` - Save an exported document

mod assessment_api;
mod auth_gateway;
mod credential_source;
mod download_sink;
mod report_exporter;
mod token_store;

pub use assessment_api::{QuestionnaireApi, ResultReader, TextApi, TwitterApi};
pub use auth_gateway::AuthGateway;
pub use credential_source::CredentialSource;
pub use download_sink::{DownloadSink, SavedDownload};
pub use report_exporter::{
    report_base_filename, ExportError, ExportFormat, ExportedDocument, ReportExporter,
};
pub use token_store::{TokenStore, TokenStoreError};
