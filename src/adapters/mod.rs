//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the application to external systems:
//! - `api` - HTTP clients for the MindMorph backend
//! - `auth` - Mock auth gateway
//! - `assessment` - In-memory assessment backend
//! - `export` - PDF/HTML/Markdown exporters and the download directory
//! - `storage` - Session token persistence

pub mod api;
pub mod assessment;
pub mod auth;
pub mod export;
pub mod storage;

pub use api::{
    ApiClient, HttpAuthGateway, HttpResultReader, QuestionnaireClient, TextClient, TwitterClient,
};
pub use assessment::InMemoryAssessmentBackend;
pub use auth::MockAuthGateway;
pub use export::{
    all_exporters, exporter_for, HtmlReportExporter, LocalDownloadSink, MarkdownReportExporter,
    PdfReportExporter,
};
pub use storage::{FileTokenStore, InMemoryTokenStore};
