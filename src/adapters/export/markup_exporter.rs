//! Markdown and HTML exporters built on the report view.
//!
//! Markdown comes straight from [`ReportView::to_markdown`]; HTML runs that
//! markdown through pulldown-cmark and wraps it in a styled document.

use pulldown_cmark::{html, Event, Options, Parser};

use crate::domain::assessment::PredictionReport;
use crate::domain::foundation::ValidationError;
use crate::domain::report::ReportView;
use crate::ports::{report_base_filename, ExportError, ExportFormat, ExportedDocument, ReportExporter};

fn render_markdown(report: &PredictionReport) -> Result<String, ExportError> {
    let missing = report.insights.missing_report_fields();
    if !missing.is_empty() {
        return Err(ValidationError::invalid_format(
            "insights",
            format!("missing required fields: {}", missing.join(", ")),
        )
        .into());
    }
    Ok(ReportView::render(&report.prediction, &report.insights).to_markdown())
}

/// Exports the report as Markdown text.
#[derive(Debug, Clone, Default)]
pub struct MarkdownReportExporter;

impl MarkdownReportExporter {
    pub fn new() -> Self {
        Self
    }
}

impl ReportExporter for MarkdownReportExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Markdown
    }

    fn export(&self, report: &PredictionReport) -> Result<ExportedDocument, ExportError> {
        let markdown = render_markdown(report)?;
        Ok(ExportedDocument::from_markdown(
            markdown,
            &report_base_filename(report.prediction.mbti_type),
        ))
    }
}

/// Exports the report as a standalone HTML page.
///
/// # Example
///
/// ```rust,ignore
/// let exporter = HtmlReportExporter::new();
/// let document = exporter.export(&report)?;
/// assert_eq!(document.format, ExportFormat::Html);
/// ```
#[derive(Debug, Clone)]
pub struct HtmlReportExporter {
    /// Include default CSS styling for HTML output.
    include_default_css: bool,
}

impl Default for HtmlReportExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl HtmlReportExporter {
    pub fn new() -> Self {
        Self {
            include_default_css: true,
        }
    }

    /// Disable default CSS styling for HTML output.
    pub fn without_default_css(mut self) -> Self {
        self.include_default_css = false;
        self
    }

    fn to_html(&self, markdown: &str, title: &str) -> String {
        let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH;
        // Raw HTML is shown as text, never passed through.
        let parser = Parser::new_ext(markdown, options).map(|event| match event {
            Event::Html(raw) => Event::Text(raw),
            other => other,
        });

        let mut body = String::new();
        html::push_html(&mut body, parser);
        self.wrap_html(body, title)
    }

    fn wrap_html(&self, body: String, title: &str) -> String {
        let css = if self.include_default_css {
            DEFAULT_CSS
        } else {
            ""
        };

        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>
{css}
    </style>
</head>
<body>
    <article class="personality-report">
{body}
    </article>
</body>
</html>"#,
            title = html_escape(title),
            css = css,
            body = body
        )
    }
}

impl ReportExporter for HtmlReportExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Html
    }

    fn export(&self, report: &PredictionReport) -> Result<ExportedDocument, ExportError> {
        let markdown = render_markdown(report)?;
        let base = report_base_filename(report.prediction.mbti_type);
        let title = base.replace('-', " ");
        Ok(ExportedDocument::from_html(self.to_html(&markdown, &title), &base))
    }
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

const DEFAULT_CSS: &str = r#"
:root {
    --brand-color: #8b5cf6;
    --text-color: #1f2937;
    --muted-color: #6b7280;
    --border-color: #e5e7eb;
}

body {
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, 'Helvetica Neue', Arial, sans-serif;
    font-size: 16px;
    line-height: 1.6;
    color: var(--text-color);
    max-width: 900px;
    margin: 0 auto;
    padding: 2rem;
}

h1 {
    font-size: 2rem;
    color: var(--brand-color);
    border-bottom: 2px solid var(--brand-color);
    padding-bottom: 0.5rem;
}

h2 {
    font-size: 1.5rem;
    border-bottom: 1px solid var(--border-color);
    padding-bottom: 0.25rem;
}

ul, ol {
    padding-left: 2em;
}

em {
    color: var(--muted-color);
}

@media print {
    body {
        font-size: 12pt;
        padding: 0;
    }

    h1, h2 {
        page-break-after: avoid;
    }
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::assessment::sample_insights;
    use crate::domain::assessment::{
        AssessmentMode, ConfidenceScores, InputMetadata, MbtiType, Prediction,
    };
    use crate::domain::foundation::PredictionId;

    fn report() -> PredictionReport {
        PredictionReport {
            prediction: Prediction {
                id: PredictionId::new("p1").unwrap(),
                mode: AssessmentMode::Questionnaire,
                mbti_type: MbtiType::parse("ENFP").unwrap(),
                confidence: ConfidenceScores::new(0.6, 0.7, 0.65, 0.8).unwrap(),
                metadata: InputMetadata::default(),
            },
            insights: sample_insights(),
        }
    }

    #[test]
    fn markdown_export_names_file_by_type() {
        let document = MarkdownReportExporter::new().export(&report()).unwrap();
        assert_eq!(document.filename, "MindMorph-ENFP-Report.md");

        let text = String::from_utf8(document.content).unwrap();
        assert!(text.starts_with("# ENFP - The Architect"));
    }

    #[test]
    fn html_export_is_a_full_document() {
        let document = HtmlReportExporter::new().export(&report()).unwrap();
        assert_eq!(document.filename, "MindMorph-ENFP-Report.html");

        let html = String::from_utf8(document.content).unwrap();
        assert!(html.contains("<!DOCTYPE html>"));
        assert!(html.contains("<title>MindMorph ENFP Report</title>"));
        assert!(html.contains("<h2>Strengths</h2>"));
        assert!(html.contains("--brand-color"));
    }

    #[test]
    fn pasted_markup_in_user_text_stays_inert() {
        let mut report = report();
        report.prediction.mode = AssessmentMode::Text;
        report.prediction.metadata.text_snippet =
            Some("hi <script>alert(1)</script> there".into());
        report.prediction.metadata.keywords = vec!["<img src=x onerror=alert(1)>".into()];
        report.insights.description = Some("# not a heading\n- not a list *or bold*".into());

        let document = HtmlReportExporter::new().export(&report).unwrap();
        let html = String::from_utf8(document.content).unwrap();

        assert!(!html.contains("<script>"));
        assert!(!html.contains("<img"));
        assert!(html.contains("hi &lt;script&gt;alert(1)&lt;/script&gt; there"));
        assert!(html.contains("# not a heading - not a list *or bold*"));
        assert!(!html.contains("<h1>not a heading</h1>"));
        assert!(!html.contains("<em>or bold</em>"));
    }

    #[test]
    fn raw_html_blocks_are_rendered_as_text() {
        let html = HtmlReportExporter::new()
            .without_default_css()
            .to_html("<div onclick=\"x()\">hi</div>\n", "t");
        assert!(!html.contains("<div onclick"));
        assert!(html.contains("&lt;div onclick"));
    }

    #[test]
    fn html_without_css_omits_styles() {
        let document = HtmlReportExporter::new()
            .without_default_css()
            .export(&report())
            .unwrap();
        let html = String::from_utf8(document.content).unwrap();
        assert!(!html.contains("--brand-color"));
    }

    #[test]
    fn incomplete_insights_are_rejected_by_every_format() {
        let mut report = report();
        report.insights.title = None;

        assert!(matches!(
            MarkdownReportExporter::new().export(&report),
            Err(ExportError::Validation(_))
        ));
        assert!(matches!(
            HtmlReportExporter::new().export(&report),
            Err(ExportError::Validation(_))
        ));
    }

    #[test]
    fn escape_handles_markup_characters() {
        assert_eq!(html_escape("<a & \"b\">"), "&lt;a &amp; &quot;b&quot;&gt;");
    }
}
