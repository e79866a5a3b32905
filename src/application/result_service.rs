//! Result retrieval and report downloads.

use std::sync::Arc;

use thiserror::Error;

use crate::application::route_guard::{Redirect, Route};
use crate::domain::assessment::{AssessmentMode, HistoryView, PredictionReport};
use crate::domain::foundation::{ClientError, PredictionId};
use crate::ports::{DownloadSink, ExportError, ExportFormat, ReportExporter, ResultReader, SavedDownload};

/// Read side of the assessments: single results and per-mode history.
#[derive(Clone)]
pub struct ResultService {
    reader: Arc<dyn ResultReader>,
}

/// History of every mode, fetched together.
#[derive(Debug, Clone)]
pub struct AllHistories {
    pub questionnaire: Result<HistoryView, ClientError>,
    pub text: Result<HistoryView, ClientError>,
    pub twitter: Result<HistoryView, ClientError>,
}

impl AllHistories {
    pub fn get(&self, mode: AssessmentMode) -> &Result<HistoryView, ClientError> {
        match mode {
            AssessmentMode::Questionnaire => &self.questionnaire,
            AssessmentMode::Text => &self.text,
            AssessmentMode::Twitter => &self.twitter,
        }
    }
}

impl ResultService {
    pub fn new(reader: Arc<dyn ResultReader>) -> Self {
        Self { reader }
    }

    #[tracing::instrument(skip_all, fields(mode = %mode, id = %id))]
    pub async fn fetch_by_id(
        &self,
        mode: AssessmentMode,
        id: &PredictionId,
    ) -> Result<PredictionReport, ClientError> {
        let report = self.reader.fetch_result(mode, id).await?;
        tracing::debug!(mbti_type = %report.prediction.mbti_type, "Loaded result");
        Ok(report)
    }

    /// The mode's history, most recent first. No predictions is `Empty`, not an error.
    #[tracing::instrument(skip_all, fields(mode = %mode))]
    pub async fn fetch_history(&self, mode: AssessmentMode) -> Result<HistoryView, ClientError> {
        let predictions = self.reader.fetch_history(mode).await?;
        tracing::debug!(count = predictions.len(), "Loaded history");
        Ok(HistoryView::from_predictions(predictions))
    }

    /// Fetches all three histories concurrently. Each mode fails independently.
    pub async fn fetch_all_histories(&self) -> AllHistories {
        let (questionnaire, text, twitter) = futures::join!(
            self.fetch_history(AssessmentMode::Questionnaire),
            self.fetch_history(AssessmentMode::Text),
            self.fetch_history(AssessmentMode::Twitter),
        );
        AllHistories {
            questionnaire,
            text,
            twitter,
        }
    }
}

/// Command to export a stored prediction and save it.
#[derive(Debug, Clone)]
pub struct DownloadReportCommand {
    pub mode: AssessmentMode,
    pub id: PredictionId,
    pub format: ExportFormat,
}

#[derive(Debug, Clone, Error)]
pub enum DownloadReportError {
    #[error(transparent)]
    Fetch(#[from] ClientError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

impl Redirect for DownloadReportError {
    fn redirect(&self) -> Option<Route> {
        match self {
            DownloadReportError::Fetch(e) => e.redirect(),
            DownloadReportError::Export(_) => None,
        }
    }
}

/// Handler for report downloads.
///
/// # Dependencies
///
/// - `ResultService`: Load the prediction and its insights
/// - `ReportExporter`s: One per supported format
/// - `DownloadSink`: Store the rendered document
pub struct DownloadReportHandler {
    results: ResultService,
    exporters: Vec<Arc<dyn ReportExporter>>,
    sink: Arc<dyn DownloadSink>,
}

impl DownloadReportHandler {
    pub fn new(
        results: ResultService,
        exporters: Vec<Arc<dyn ReportExporter>>,
        sink: Arc<dyn DownloadSink>,
    ) -> Self {
        Self {
            results,
            exporters,
            sink,
        }
    }

    fn exporter(&self, format: ExportFormat) -> Result<&dyn ReportExporter, ExportError> {
        self.exporters
            .iter()
            .find(|e| e.format() == format)
            .map(|e| &**e)
            .ok_or_else(|| ExportError::UnsupportedFormat(format.to_string()))
    }

    pub async fn handle(&self, cmd: DownloadReportCommand) -> Result<SavedDownload, DownloadReportError> {
        // Resolve the exporter first so an unsupported format costs no request.
        let exporter = self.exporter(cmd.format)?;
        let report = self.results.fetch_by_id(cmd.mode, &cmd.id).await?;
        let document = exporter.export(&report)?;
        let saved = self.sink.save(&document).await?;
        tracing::info!(
            id = %cmd.id,
            format = %cmd.format,
            path = %saved.path.display(),
            "Report downloaded"
        );
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::assessment::{sample_insights, InMemoryAssessmentBackend};
    use crate::adapters::export::{LocalDownloadSink, MarkdownReportExporter, PdfReportExporter};
    use crate::domain::assessment::{
        ConfidenceScores, InputMetadata, InsightBundle, MbtiType, Prediction,
    };
    use crate::domain::foundation::{AuthError, Timestamp};
    use crate::ports::TextApi;

    fn stored(id: &str, mode: AssessmentMode, at: &str) -> Prediction {
        Prediction {
            id: PredictionId::new(id).unwrap(),
            mode,
            mbti_type: MbtiType::parse("ENFP").unwrap(),
            confidence: ConfidenceScores::new(0.7, 0.6, 0.55, 0.8).unwrap(),
            metadata: InputMetadata {
                timestamp: Some(Timestamp::parse(at).unwrap()),
                ..Default::default()
            },
        }
    }

    #[tokio::test]
    async fn history_is_sorted_newest_first() {
        let backend = InMemoryAssessmentBackend::new()
            .with_stored(stored("old", AssessmentMode::Text, "2024-01-01T10:00:00Z"))
            .with_stored(stored("new", AssessmentMode::Text, "2024-03-01T10:00:00Z"))
            .with_stored(stored("mid", AssessmentMode::Text, "2024-02-01T10:00:00Z"));
        let service = ResultService::new(Arc::new(backend));

        let history = service.fetch_history(AssessmentMode::Text).await.unwrap();

        let ids: Vec<&str> = history.entries().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);
    }

    #[tokio::test]
    async fn empty_history_is_not_an_error() {
        let service = ResultService::new(Arc::new(InMemoryAssessmentBackend::new()));
        let history = service.fetch_history(AssessmentMode::Twitter).await.unwrap();
        assert!(history.is_empty());
        assert!(history.stats().is_none());
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let service = ResultService::new(Arc::new(InMemoryAssessmentBackend::new()));
        let err = service
            .fetch_by_id(AssessmentMode::Text, &PredictionId::new("missing").unwrap())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Result not found");
    }

    #[tokio::test]
    async fn all_histories_are_independent() {
        let backend = InMemoryAssessmentBackend::new().with_stored(stored(
            "q1",
            AssessmentMode::Questionnaire,
            "2024-01-01T10:00:00Z",
        ));
        let service = ResultService::new(Arc::new(backend));

        let all = service.fetch_all_histories().await;

        assert_eq!(all.get(AssessmentMode::Questionnaire).as_ref().unwrap().entries().len(), 1);
        assert!(all.text.as_ref().unwrap().is_empty());
        assert!(all.twitter.as_ref().unwrap().is_empty());
    }

    fn handler(backend: Arc<InMemoryAssessmentBackend>, dir: &std::path::Path) -> DownloadReportHandler {
        DownloadReportHandler::new(
            ResultService::new(backend),
            vec![
                Arc::new(PdfReportExporter::new()),
                Arc::new(MarkdownReportExporter::new()),
            ],
            Arc::new(LocalDownloadSink::new(dir)),
        )
    }

    #[tokio::test]
    async fn downloads_a_submitted_report() {
        let dir = tempfile::tempdir().unwrap();
        let backend = Arc::new(InMemoryAssessmentBackend::new());
        let submission = backend.submit_text(&"a".repeat(120)).await.unwrap();

        let saved = handler(backend, dir.path())
            .handle(DownloadReportCommand {
                mode: AssessmentMode::Text,
                id: submission.prediction_id,
                format: ExportFormat::Pdf,
            })
            .await
            .unwrap();

        assert!(saved.path.ends_with("MindMorph-INTJ-Report.pdf"));
        assert!(saved.size_bytes > 0);
        assert_eq!(saved.checksum.len(), 64);
    }

    #[tokio::test]
    async fn unsupported_format_makes_no_request() {
        let dir = tempfile::tempdir().unwrap();
        let backend = Arc::new(
            InMemoryAssessmentBackend::new().with_error(ClientError::from(AuthError::TokenExpired)),
        );

        let err = handler(backend, dir.path())
            .handle(DownloadReportCommand {
                mode: AssessmentMode::Text,
                id: PredictionId::new("pred-1").unwrap(),
                format: ExportFormat::Html,
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DownloadReportError::Export(ExportError::UnsupportedFormat(_))
        ));
    }

    #[tokio::test]
    async fn incomplete_insights_save_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let insights = InsightBundle {
            careers: Vec::new(),
            ..sample_insights()
        };
        let backend = Arc::new(InMemoryAssessmentBackend::new().with_insights(insights));
        let submission = backend.submit_text(&"a".repeat(120)).await.unwrap();

        let err = handler(backend, dir.path())
            .handle(DownloadReportCommand {
                mode: AssessmentMode::Text,
                id: submission.prediction_id,
                format: ExportFormat::Markdown,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, DownloadReportError::Export(ExportError::Validation(_))));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn expired_session_redirects_to_login() {
        let dir = tempfile::tempdir().unwrap();
        let backend = Arc::new(
            InMemoryAssessmentBackend::new().with_error(ClientError::from(AuthError::TokenExpired)),
        );

        let err = handler(backend, dir.path())
            .handle(DownloadReportCommand {
                mode: AssessmentMode::Text,
                id: PredictionId::new("pred-1").unwrap(),
                format: ExportFormat::Pdf,
            })
            .await
            .unwrap_err();

        assert_eq!(err.redirect(), Some(Route::Login));
    }
}
