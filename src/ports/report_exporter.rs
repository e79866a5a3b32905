//! Report Exporter Port - Turns a prediction into a downloadable document.
//!
//! This port defines the contract for rendering a prediction report in a
//! given format (PDF, HTML, Markdown). The application depends on this trait,
//! while adapters (like PdfReportExporter) provide the implementation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::assessment::{MbtiType, PredictionReport};
use crate::domain::foundation::ValidationError;

/// Port for exporting a prediction report.
///
/// # Contract
///
/// Implementations must:
/// - Be pure: no network access, same input gives the same document
/// - Reject incomplete insight data with `ExportError::Validation` and
///   produce no bytes in that case
/// - Name the file `MindMorph-{TYPE}-Report.{ext}`
///
/// # Usage
///
/// ```rust,ignore
/// let exporter: &dyn ReportExporter = get_exporter(ExportFormat::Pdf);
/// let document = exporter.export(&report)?;
/// sink.save(&document).await?;
/// ```
pub trait ReportExporter: Send + Sync {
    /// The format this exporter produces.
    fn format(&self) -> ExportFormat;

    /// Render the report.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::Validation` if required insight fields are
    /// missing, or a conversion error if rendering fails.
    fn export(&self, report: &PredictionReport) -> Result<ExportedDocument, ExportError>;
}

/// Export formats supported by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    /// Raw markdown (no conversion needed).
    Markdown,
    /// PDF document.
    Pdf,
    /// HTML document.
    Html,
}

impl ExportFormat {
    /// Get the MIME content type for this format.
    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Markdown => "text/markdown; charset=utf-8",
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Html => "text/html; charset=utf-8",
        }
    }

    /// Get the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Markdown => "md",
            ExportFormat::Pdf => "pdf",
            ExportFormat::Html => "html",
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Markdown => write!(f, "markdown"),
            ExportFormat::Pdf => write!(f, "pdf"),
            ExportFormat::Html => write!(f, "html"),
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            "pdf" => Ok(ExportFormat::Pdf),
            "html" | "htm" => Ok(ExportFormat::Html),
            _ => Err(ExportError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Exported document with content and metadata.
#[derive(Debug, Clone)]
pub struct ExportedDocument {
    /// The exported content as bytes.
    pub content: Vec<u8>,
    /// The MIME content type.
    pub content_type: String,
    /// Suggested filename for download.
    pub filename: String,
    /// The format that was used.
    pub format: ExportFormat,
}

/// Base filename (without extension) for a report on the given type.
pub fn report_base_filename(mbti_type: MbtiType) -> String {
    format!("MindMorph-{}-Report", mbti_type)
}

impl ExportedDocument {
    /// Create a new exported document.
    pub fn new(
        content: Vec<u8>,
        format: ExportFormat,
        base_filename: &str,
    ) -> Self {
        Self {
            content,
            content_type: format.content_type().to_string(),
            filename: format!("{}.{}", base_filename, format.extension()),
            format,
        }
    }

    /// Size of the content in bytes.
    pub fn size(&self) -> usize {
        self.content.len()
    }

    /// Create from markdown content (no conversion needed).
    pub fn from_markdown(markdown: String, base_filename: &str) -> Self {
        Self::new(markdown.into_bytes(), ExportFormat::Markdown, base_filename)
    }

    /// Create from HTML content.
    pub fn from_html(html: String, base_filename: &str) -> Self {
        Self::new(html.into_bytes(), ExportFormat::Html, base_filename)
    }

    /// Create from PDF bytes.
    pub fn from_pdf(pdf_bytes: Vec<u8>, base_filename: &str) -> Self {
        Self::new(pdf_bytes, ExportFormat::Pdf, base_filename)
    }
}

/// Errors that can occur during document export.
#[derive(Debug, Clone, Error)]
pub enum ExportError {
    /// Insight data is incomplete; nothing was generated.
    #[error("Cannot export report: {0}")]
    Validation(#[from] ValidationError),

    /// Unsupported export format requested.
    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),

    /// Conversion to PDF failed.
    #[error("PDF conversion failed: {0}")]
    PdfConversionFailed(String),

    /// Conversion to HTML failed.
    #[error("HTML conversion failed: {0}")]
    HtmlConversionFailed(String),

    /// I/O error while saving the document.
    #[error("I/O error during export: {0}")]
    IoError(String),
}

impl ExportError {
    /// Create a PDF conversion error.
    pub fn pdf_failed(reason: impl Into<String>) -> Self {
        Self::PdfConversionFailed(reason.into())
    }

    /// Create an HTML conversion error.
    pub fn html_failed(reason: impl Into<String>) -> Self {
        Self::HtmlConversionFailed(reason.into())
    }

    /// Create an I/O error.
    pub fn io_error(reason: impl Into<String>) -> Self {
        Self::IoError(reason.into())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    // ───────────────────────────────────────────────────────────────
    // ExportFormat tests
    // ───────────────────────────────────────────────────────────────

    #[test]
    fn export_format_metadata_matches_format() {
        let cases = [
            (ExportFormat::Pdf, "application/pdf", "pdf"),
            (ExportFormat::Html, "text/html; charset=utf-8", "html"),
            (ExportFormat::Markdown, "text/markdown; charset=utf-8", "md"),
        ];
        for (format, content_type, extension) in cases {
            assert_eq!(format.content_type(), content_type);
            assert_eq!(format.extension(), extension);
        }
    }

    #[test]
    fn export_format_parses_aliases_case_insensitively() {
        assert_eq!("PDF".parse::<ExportFormat>().unwrap(), ExportFormat::Pdf);
        assert_eq!("htm".parse::<ExportFormat>().unwrap(), ExportFormat::Html);
        assert_eq!("md".parse::<ExportFormat>().unwrap(), ExportFormat::Markdown);
        assert!(matches!(
            "docx".parse::<ExportFormat>().unwrap_err(),
            ExportError::UnsupportedFormat(_)
        ));
    }

    #[test]
    fn export_format_deserializes_from_config_value() {
        let format: ExportFormat = serde_json::from_str("\"html\"").unwrap();
        assert_eq!(format, ExportFormat::Html);
        assert_eq!(format.to_string(), "html");
    }

    // ───────────────────────────────────────────────────────────────
    // ExportedDocument tests
    // ───────────────────────────────────────────────────────────────

    #[test]
    fn report_filename_carries_type_code() {
        let mbti = MbtiType::parse("istj").unwrap();
        let doc = ExportedDocument::from_pdf(b"%PDF".to_vec(), &report_base_filename(mbti));
        assert_eq!(doc.filename, "MindMorph-ISTJ-Report.pdf");
        assert_eq!(doc.content_type, "application/pdf");
        assert_eq!(doc.size(), 4);
    }

    #[test]
    fn html_and_markdown_documents_use_their_extensions() {
        let html = ExportedDocument::from_html("<p>hi</p>".into(), "MindMorph-INTP-Report");
        let md = ExportedDocument::from_markdown("# hi".into(), "MindMorph-INTP-Report");
        assert_eq!(html.filename, "MindMorph-INTP-Report.html");
        assert_eq!(md.filename, "MindMorph-INTP-Report.md");
        assert_eq!(md.content, b"# hi");
    }

    // ───────────────────────────────────────────────────────────────
    // ExportError tests
    // ───────────────────────────────────────────────────────────────

    #[test]
    fn validation_error_names_the_problem() {
        let err = ExportError::from(ValidationError::empty_field("careers"));
        assert!(err.to_string().starts_with("Cannot export report"));
        assert!(err.to_string().contains("careers"));
    }

    #[test]
    fn report_exporter_is_object_safe() {
        fn check<T: ReportExporter + ?Sized>() {}
        check::<dyn ReportExporter>();
    }
}
