//! Page plan for the exported PDF report.
//!
//! The layout is computed up front in millimetres on an A4 page with the
//! origin at the top-left corner. Renderers only translate elements; every
//! pagination decision is made here, so the plan is deterministic for a given
//! prediction, insight bundle and generation time.

use crate::domain::assessment::{InsightBundle, Prediction};
use crate::domain::foundation::{Timestamp, ValidationError};

use super::view::{ReportView, SectionBody, SectionKind};

pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;
/// Past this cursor position a flowing page continues on a new page.
pub const BOTTOM_MARGIN_MM: f32 = 270.0;
const TOP_MARGIN_MM: f32 = 30.0;
const LEFT_MARGIN_MM: f32 = 20.0;
const CONTENT_WIDTH_MM: f32 = 170.0;
const FOOTER_Y_MM: f32 = 285.0;

pub const FOOTER_TEXT: &str = "Generated by MindMorph - Personality Assessment Platform";

/// Helvetica averages roughly half an em per glyph.
const AVG_GLYPH_EM: f32 = 0.5;
const MM_PER_PT: f32 = 25.4 / 72.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BRAND: Rgb = Rgb(139, 92, 246);
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const TRACK: Rgb = Rgb(200, 200, 200);
    pub const MUTED: Rgb = Rgb(100, 100, 100);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Regular,
    Bold,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    /// Filled rectangle; `y` is the top edge.
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Rgb,
    },
    /// Single line of text; `y` is the baseline.
    Text {
        x: f32,
        y: f32,
        size: f32,
        text: String,
        align: Align,
        style: FontStyle,
        color: Rgb,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageKind {
    Cover,
    Overview,
    StrengthsAndGrowth,
    CareersAndStudy,
    Compatibility,
    Closing,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub kind: PageKind,
    pub background: Rgb,
    pub elements: Vec<Element>,
}

impl Page {
    fn new(kind: PageKind, background: Rgb) -> Self {
        Self {
            kind,
            background,
            elements: Vec::new(),
        }
    }

    /// All text on the page, in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.elements.iter().filter_map(|e| match e {
            Element::Text { text, .. } => Some(text.as_str()),
            Element::Rect { .. } => None,
        })
    }
}

/// The full page plan.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportLayout {
    pages: Vec<Page>,
}

impl ExportLayout {
    /// Plans the report pages.
    ///
    /// Fails without producing anything if a required insight field is
    /// missing: title, description, strengths, weaknesses, careers, growth
    /// tips or famous people.
    pub fn plan(
        prediction: &Prediction,
        insights: &InsightBundle,
        generated_at: Timestamp,
    ) -> Result<Self, ValidationError> {
        let missing = insights.missing_report_fields();
        if !missing.is_empty() {
            return Err(ValidationError::invalid_format(
                "insights",
                format!("missing required fields: {}", missing.join(", ")),
            ));
        }

        let view = ReportView::render(prediction, insights);
        let mut builder = Builder::default();

        cover(&mut builder, &view, generated_at);
        overview(&mut builder, &view);
        strengths(&mut builder, &view);
        careers(&mut builder, &view);
        if view.section(SectionKind::Compatibility).is_some() {
            compatibility(&mut builder, &view);
        }
        closing(&mut builder, &view);

        Ok(Self {
            pages: builder.pages,
        })
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn count_of(&self, kind: PageKind) -> usize {
        self.pages.iter().filter(|p| p.kind == kind).count()
    }

    pub fn has_page(&self, kind: PageKind) -> bool {
        self.count_of(kind) > 0
    }
}

/// Greedy word wrap using an average glyph width estimate.
pub fn wrap_text(text: &str, max_width_mm: f32, font_size: f32) -> Vec<String> {
    let glyph_mm = font_size * AVG_GLYPH_EM * MM_PER_PT;
    let max_chars = ((max_width_mm / glyph_mm).floor() as usize).max(1);

    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        let current_len = current.chars().count();
        if current.is_empty() {
            current.push_str(word);
        } else if current_len + 1 + word_len <= max_chars {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
        // Hard-split words longer than a full line.
        while current.chars().count() > max_chars {
            let head: String = current.chars().take(max_chars).collect();
            let tail: String = current.chars().skip(max_chars).collect();
            lines.push(head);
            current = tail;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[derive(Default)]
struct Builder {
    pages: Vec<Page>,
    y: f32,
}

impl Builder {
    fn start_page(&mut self, kind: PageKind, background: Rgb) {
        self.pages.push(Page::new(kind, background));
        self.y = TOP_MARGIN_MM;
    }

    fn push(&mut self, element: Element) {
        if let Some(page) = self.pages.last_mut() {
            page.elements.push(element);
        }
    }

    fn text(&mut self, x: f32, y: f32, size: f32, text: impl Into<String>) {
        self.styled_text(x, y, size, text, Align::Left, FontStyle::Regular, Rgb::BLACK);
    }

    #[allow(clippy::too_many_arguments)]
    fn styled_text(
        &mut self,
        x: f32,
        y: f32,
        size: f32,
        text: impl Into<String>,
        align: Align,
        style: FontStyle,
        color: Rgb,
    ) {
        self.push(Element::Text {
            x,
            y,
            size,
            text: text.into(),
            align,
            style,
            color,
        });
    }

    /// Writes wrapped lines from the cursor down, continuing on a new page
    /// whenever the next line would pass the bottom margin.
    fn paragraph(&mut self, x: f32, width: f32, size: f32, line_height: f32, text: &str) {
        for line in wrap_text(text, width, size) {
            self.ensure_room(line_height);
            self.text(x, self.y, size, line);
            self.y += line_height;
        }
    }

    fn heading(&mut self, text: &str) {
        self.ensure_room(15.0);
        self.text(LEFT_MARGIN_MM, self.y, 20.0, text);
        self.y += 15.0;
    }

    /// Starts a continuation page of the same kind unless `height` more
    /// millimetres fit above the bottom margin. A fresh page never breaks.
    fn ensure_room(&mut self, height: f32) {
        if self.y > TOP_MARGIN_MM && self.y + height > BOTTOM_MARGIN_MM {
            let kind = self.pages.last().map_or(PageKind::Closing, |p| p.kind);
            self.start_page(kind, Rgb::WHITE);
        }
    }
}

/// Height a wrapped paragraph will take.
fn measure(text: &str, width: f32, size: f32, line_height: f32) -> f32 {
    wrap_text(text, width, size).len() as f32 * line_height
}

fn list_items(view: &ReportView, kind: SectionKind) -> Vec<String> {
    match view.section(kind).map(|s| &s.body) {
        Some(SectionBody::Bullets(items))
        | Some(SectionBody::Numbered(items))
        | Some(SectionBody::Tags(items)) => items.clone(),
        _ => Vec::new(),
    }
}

fn cover(b: &mut Builder, view: &ReportView, generated_at: Timestamp) {
    let center = PAGE_WIDTH_MM / 2.0;
    let headline = &view.headline;

    b.start_page(PageKind::Cover, Rgb::BRAND);
    let lines = [
        (100.0, 40.0, "MindMorph".to_string()),
        (120.0, 28.0, "Personality Report".to_string()),
        (160.0, 50.0, headline.mbti_type.to_string()),
        (180.0, 22.0, headline.title.clone().unwrap_or_default()),
    ];
    for (y, size, text) in lines {
        b.styled_text(center, y, size, text, Align::Center, FontStyle::Bold, Rgb::WHITE);
    }
    b.styled_text(
        center,
        260.0,
        12.0,
        format!("Generated: {}", generated_at.date_label()),
        Align::Center,
        FontStyle::Regular,
        Rgb::WHITE,
    );
}

fn overview(b: &mut Builder, view: &ReportView) {
    let headline = &view.headline;

    b.start_page(PageKind::Overview, Rgb::WHITE);
    b.text(LEFT_MARGIN_MM, 30.0, 24.0, "Your Personality Type");
    b.text(
        LEFT_MARGIN_MM,
        45.0,
        16.0,
        format!(
            "{} - {}",
            headline.mbti_type,
            headline.title.as_deref().unwrap_or_default()
        ),
    );

    b.y = 60.0;
    let description = headline.description.as_deref().unwrap_or_default();
    b.paragraph(LEFT_MARGIN_MM, CONTENT_WIDTH_MM, 11.0, 5.0, description);
    b.y = (b.y + 10.0).max(90.0);

    // Heading plus the first bar stay together.
    b.ensure_room(22.0);
    b.text(LEFT_MARGIN_MM, b.y, 16.0, "Confidence Breakdown");
    b.y += 10.0;
    for bar in &view.confidence {
        b.ensure_room(12.0);
        b.text(LEFT_MARGIN_MM, b.y, 11.0, format!("{}: {}%", bar.pole, bar.percent));
        b.push(Element::Rect {
            x: 80.0,
            y: b.y - 4.0,
            width: 100.0,
            height: 6.0,
            color: Rgb::TRACK,
        });
        b.push(Element::Rect {
            x: 80.0,
            y: b.y - 4.0,
            width: f32::from(bar.percent),
            height: 6.0,
            color: Rgb::BRAND,
        });
        b.y += 12.0;
    }

    if let Some(population) = &headline.population {
        b.y += 10.0;
        b.ensure_room(5.0);
        b.text(LEFT_MARGIN_MM, b.y, 11.0, format!("Population: {}", population));
    }
}

fn list(
    b: &mut Builder,
    items: &[String],
    line_height: f32,
    gap: f32,
    marker: impl Fn(usize) -> String,
) {
    for (i, item) in items.iter().enumerate() {
        let text = format!("{} {}", marker(i), item);
        b.ensure_room(measure(&text, 165.0, 11.0, line_height));
        b.paragraph(25.0, 165.0, 11.0, line_height, &text);
        b.y += gap;
    }
}

fn numbered(b: &mut Builder, items: &[String], line_height: f32, gap: f32) {
    list(b, items, line_height, gap, |i| format!("{}.", i + 1));
}

fn bulleted(b: &mut Builder, items: &[String], line_height: f32, gap: f32) {
    list(b, items, line_height, gap, |_| "\u{2022}".to_string());
}

fn strengths(b: &mut Builder, view: &ReportView) {
    b.start_page(PageKind::StrengthsAndGrowth, Rgb::WHITE);
    b.heading(SectionKind::Strengths.heading());
    numbered(b, &list_items(view, SectionKind::Strengths), 6.0, 4.0);

    b.y += 15.0;
    b.heading(SectionKind::GrowthAreas.heading());
    numbered(b, &list_items(view, SectionKind::GrowthAreas), 6.0, 4.0);
}

fn careers(b: &mut Builder, view: &ReportView) {
    b.start_page(PageKind::CareersAndStudy, Rgb::WHITE);
    b.heading(SectionKind::Careers.heading());
    bulleted(b, &list_items(view, SectionKind::Careers), 6.0, 4.0);

    let habits = list_items(view, SectionKind::StudyHabits);
    if !habits.is_empty() {
        b.y += 15.0;
        b.heading(SectionKind::StudyHabits.heading());
        bulleted(b, &habits, 7.0, 0.0);
    }
}

fn compatibility(b: &mut Builder, view: &ReportView) {
    let Some(SectionBody::Matches(cards)) = view.section(SectionKind::Compatibility).map(|s| &s.body)
    else {
        return;
    };

    b.start_page(PageKind::Compatibility, Rgb::WHITE);
    b.heading(SectionKind::Compatibility.heading());

    for card in cards {
        let why_height = card
            .why
            .as_deref()
            .map_or(0.0, |why| measure(why, CONTENT_WIDTH_MM, 10.0, 6.0) + 5.0);
        let challenges_height = card
            .challenges
            .as_deref()
            .map_or(0.0, |text| measure(text, 148.0, 10.0, 6.0));
        // Cards move to the next page whole when they fit on one; taller
        // cards only need their title and first line to fit.
        let card_height = 10.0 + why_height + challenges_height;
        if card_height <= BOTTOM_MARGIN_MM - TOP_MARGIN_MM {
            b.ensure_room(card_height);
        } else {
            b.ensure_room(16.0);
        }

        let title = match card.score {
            Some(score) => format!("{} ({}% Match)", card.mbti_type, score),
            None => card.mbti_type.clone(),
        };
        b.text(LEFT_MARGIN_MM, b.y, 14.0, title);
        b.y += 10.0;

        if let Some(why) = &card.why {
            b.paragraph(LEFT_MARGIN_MM, CONTENT_WIDTH_MM, 10.0, 6.0, why);
            b.y += 5.0;
        }

        if let Some(challenges) = &card.challenges {
            b.ensure_room(6.0);
            b.styled_text(
                LEFT_MARGIN_MM,
                b.y,
                10.0,
                "Challenge:",
                Align::Left,
                FontStyle::Bold,
                Rgb::BLACK,
            );
            b.paragraph(42.0, 148.0, 10.0, 6.0, challenges);
        }
        b.y += 15.0;
    }
}

fn closing(b: &mut Builder, view: &ReportView) {
    b.start_page(PageKind::Closing, Rgb::WHITE);
    b.heading(SectionKind::GrowthTips.heading());
    numbered(b, &list_items(view, SectionKind::GrowthTips), 7.0, 5.0);

    b.y += 15.0;
    b.heading(SectionKind::NotableExamples.heading());
    let people = list_items(view, SectionKind::NotableExamples).join(", ");
    b.paragraph(LEFT_MARGIN_MM, CONTENT_WIDTH_MM, 11.0, 6.0, &people);

    b.styled_text(
        PAGE_WIDTH_MM / 2.0,
        FOOTER_Y_MM,
        10.0,
        FOOTER_TEXT,
        Align::Center,
        FontStyle::Regular,
        Rgb::MUTED,
    );
}
