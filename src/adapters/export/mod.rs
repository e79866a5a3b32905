//! Report export adapters.
//!
//! - **PdfReportExporter** - paginated PDF via lopdf
//! - **HtmlReportExporter** - styled HTML via pulldown-cmark
//! - **MarkdownReportExporter** - the report view as Markdown
//! - **LocalDownloadSink** - saves documents into a download directory

mod local_download_sink;
mod markup_exporter;
mod pdf_exporter;

pub use local_download_sink::LocalDownloadSink;
pub use markup_exporter::{HtmlReportExporter, MarkdownReportExporter};
pub use pdf_exporter::PdfReportExporter;

use std::sync::Arc;

use crate::ports::{ExportFormat, ReportExporter};

/// Returns the exporter for a format.
pub fn exporter_for(format: ExportFormat) -> Box<dyn ReportExporter> {
    match format {
        ExportFormat::Pdf => Box::new(PdfReportExporter::new()),
        ExportFormat::Html => Box::new(HtmlReportExporter::new()),
        ExportFormat::Markdown => Box::new(MarkdownReportExporter::new()),
    }
}

/// One exporter per supported format.
pub fn all_exporters() -> Vec<Arc<dyn ReportExporter>> {
    [ExportFormat::Pdf, ExportFormat::Html, ExportFormat::Markdown]
        .into_iter()
        .map(|format| Arc::from(exporter_for(format)))
        .collect()
}
