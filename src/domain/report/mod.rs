//! Report domain - the rendered view of a prediction and the PDF page plan.

mod layout;
mod view;

pub use layout::{
    wrap_text, Align, Element, ExportLayout, FontStyle, Page, PageKind, Rgb, BOTTOM_MARGIN_MM,
    FOOTER_TEXT, PAGE_HEIGHT_MM, PAGE_WIDTH_MM,
};
pub use view::{
    ConfidenceBar, Headline, MatchCard, ReportSection, ReportView, SectionBody, SectionKind,
    SummaryItem,
};
