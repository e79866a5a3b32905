//! lopdf-based PDF exporter.
//!
//! Draws the page plan from [`ExportLayout`] onto A4 pages using the two
//! standard Helvetica faces, so no font files are embedded.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream, StringFormat};

use crate::domain::assessment::PredictionReport;
use crate::domain::foundation::Timestamp;
use crate::domain::report::{
    Align, Element, ExportLayout, FontStyle, Page, Rgb, PAGE_HEIGHT_MM, PAGE_WIDTH_MM,
};
use crate::ports::{report_base_filename, ExportError, ExportFormat, ExportedDocument, ReportExporter};

const PT_PER_MM: f32 = 72.0 / 25.4;
/// Average Helvetica glyph width in em, matching the layout's wrap estimate.
const AVG_GLYPH_EM: f32 = 0.5;

const REGULAR_FONT: &str = "F1";
const BOLD_FONT: &str = "F2";

/// Renders reports to PDF.
///
/// # Example
///
/// ```rust,ignore
/// let exporter = PdfReportExporter::new();
/// let document = exporter.export(&report)?;
/// assert_eq!(document.filename, "MindMorph-INTJ-Report.pdf");
/// ```
#[derive(Debug, Clone)]
pub struct PdfReportExporter {
    /// Compress page streams (disable to inspect output by hand).
    compress: bool,
}

impl Default for PdfReportExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfReportExporter {
    pub fn new() -> Self {
        Self { compress: true }
    }

    pub fn without_compression(mut self) -> Self {
        self.compress = false;
        self
    }

    /// Renders an already planned layout.
    pub fn render(&self, layout: &ExportLayout) -> Result<Vec<u8>, ExportError> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let regular_id = doc.add_object(font_dictionary("Helvetica"));
        let bold_id = doc.add_object(font_dictionary("Helvetica-Bold"));
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                REGULAR_FONT => regular_id,
                BOLD_FONT => bold_id,
            },
        });

        let mut kids: Vec<Object> = Vec::with_capacity(layout.page_count());
        for page in layout.pages() {
            let content = Content {
                operations: page_operations(page),
            };
            let bytes = content
                .encode()
                .map_err(|e| ExportError::pdf_failed(format!("Failed to encode page: {}", e)))?;
            let content_id = doc.add_object(Stream::new(dictionary! {}, bytes));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => layout.page_count() as i64,
            "Resources" => resources_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                to_pt(PAGE_WIDTH_MM).into(),
                to_pt(PAGE_HEIGHT_MM).into(),
            ],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id: ObjectId = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        if self.compress {
            doc.compress();
        }

        let mut out = Vec::new();
        doc.save_to(&mut out)
            .map_err(|e| ExportError::pdf_failed(format!("Failed to write PDF: {}", e)))?;
        Ok(out)
    }
}

impl ReportExporter for PdfReportExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Pdf
    }

    fn export(&self, report: &PredictionReport) -> Result<ExportedDocument, ExportError> {
        let layout = ExportLayout::plan(&report.prediction, &report.insights, Timestamp::now())?;
        let bytes = self.render(&layout)?;

        tracing::info!(
            mbti_type = %report.prediction.mbti_type,
            pages = layout.page_count(),
            size_bytes = bytes.len(),
            "PDF report generated"
        );
        Ok(ExportedDocument::from_pdf(
            bytes,
            &report_base_filename(report.prediction.mbti_type),
        ))
    }
}

fn font_dictionary(base_font: &str) -> lopdf::Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base_font,
        "Encoding" => "WinAnsiEncoding",
    }
}

fn to_pt(mm: f32) -> f32 {
    mm * PT_PER_MM
}

/// Layout y runs down from the top edge; PDF y runs up from the bottom.
fn flip_y(y_mm: f32) -> f32 {
    to_pt(PAGE_HEIGHT_MM - y_mm)
}

fn fill_color(color: Rgb) -> Operation {
    let Rgb(r, g, b) = color;
    Operation::new(
        "rg",
        vec![
            (r as f32 / 255.0).into(),
            (g as f32 / 255.0).into(),
            (b as f32 / 255.0).into(),
        ],
    )
}

fn rect(ops: &mut Vec<Operation>, x: f32, y: f32, width: f32, height: f32, color: Rgb) {
    ops.push(fill_color(color));
    ops.push(Operation::new(
        "re",
        vec![
            to_pt(x).into(),
            flip_y(y + height).into(),
            to_pt(width).into(),
            to_pt(height).into(),
        ],
    ));
    ops.push(Operation::new("f", vec![]));
}

fn page_operations(page: &Page) -> Vec<Operation> {
    let mut ops = Vec::new();
    if page.background != Rgb::WHITE {
        rect(&mut ops, 0.0, 0.0, PAGE_WIDTH_MM, PAGE_HEIGHT_MM, page.background);
    }

    for element in &page.elements {
        match element {
            Element::Rect {
                x,
                y,
                width,
                height,
                color,
            } => rect(&mut ops, *x, *y, *width, *height, *color),
            Element::Text {
                x,
                y,
                size,
                text,
                align,
                style,
                color,
            } => {
                let encoded = win_ansi(text);
                let x_pt = match align {
                    Align::Left => to_pt(*x),
                    Align::Center => to_pt(*x) - encoded.len() as f32 * size * AVG_GLYPH_EM / 2.0,
                };
                let font = match style {
                    FontStyle::Regular => REGULAR_FONT,
                    FontStyle::Bold => BOLD_FONT,
                };
                ops.push(Operation::new("BT", vec![]));
                ops.push(fill_color(*color));
                ops.push(Operation::new("Tf", vec![font.into(), (*size).into()]));
                ops.push(Operation::new("Td", vec![x_pt.into(), flip_y(*y).into()]));
                ops.push(Operation::new(
                    "Tj",
                    vec![Object::String(encoded, StringFormat::Literal)],
                ));
                ops.push(Operation::new("ET", vec![]));
            }
        }
    }
    ops
}

/// Encodes text for the standard fonts' WinAnsi encoding.
///
/// Typographic punctuation maps to its WinAnsi slot; anything else outside
/// Latin-1 becomes `?`.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\u{2022}' => 0x95,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201C}' => 0x93,
            '\u{201D}' => 0x94,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '\u{2026}' => 0x85,
            c if (c as u32) < 0x80 || (0xA0..=0xFF).contains(&(c as u32)) => c as u32 as u8,
            _ => b'?',
        })
        .collect()
}
