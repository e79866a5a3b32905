//! Structured, display-ready view of a prediction.
//!
//! Rendering is pure: the same prediction and insights always yield the same
//! view. Absent or empty insight fields produce no section at all.

use std::fmt::Write as _;

use crate::domain::assessment::{
    AssessmentMode, Dimension, InsightBundle, MbtiType, Prediction,
};

/// Type code plus the headline insight text.
#[derive(Debug, Clone, PartialEq)]
pub struct Headline {
    pub mbti_type: MbtiType,
    pub title: Option<String>,
    /// Population share, e.g. "2-4%".
    pub population: Option<String>,
    pub description: Option<String>,
}

/// One confidence bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfidenceBar {
    pub dimension: Dimension,
    /// Name of the predicted pole, e.g. "Introversion".
    pub pole: &'static str,
    pub percent: u8,
}

/// A labelled fact about the analyzed input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryItem {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Keywords,
    Strengths,
    GrowthAreas,
    Careers,
    StudyHabits,
    Compatibility,
    GrowthTips,
    NotableExamples,
}

impl SectionKind {
    pub fn heading(&self) -> &'static str {
        match self {
            SectionKind::Keywords => "Key Themes",
            SectionKind::Strengths => "Strengths",
            SectionKind::GrowthAreas => "Growth Areas",
            SectionKind::Careers => "Recommended Careers",
            SectionKind::StudyHabits => "Study Habits",
            SectionKind::Compatibility => "Best Compatibility Matches",
            SectionKind::GrowthTips => "Personal Growth Tips",
            SectionKind::NotableExamples => "Famous People",
        }
    }
}

/// A compatibility match card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchCard {
    pub mbti_type: String,
    pub score: Option<u8>,
    pub why: Option<String>,
    pub challenges: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionBody {
    Bullets(Vec<String>),
    Numbered(Vec<String>),
    Tags(Vec<String>),
    Matches(Vec<MatchCard>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSection {
    pub kind: SectionKind,
    pub body: SectionBody,
}

/// The rendered report.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportView {
    pub mode: AssessmentMode,
    pub headline: Headline,
    pub confidence: Vec<ConfidenceBar>,
    pub input_summary: Vec<SummaryItem>,
    pub sections: Vec<ReportSection>,
}

impl ReportView {
    /// Renders a prediction and its insights.
    pub fn render(prediction: &Prediction, insights: &InsightBundle) -> Self {
        let mbti = prediction.mbti_type;

        let headline = Headline {
            mbti_type: mbti,
            title: non_blank(&insights.title),
            population: non_blank(&insights.percentage),
            description: non_blank(&insights.description),
        };

        let confidence = Dimension::ALL
            .iter()
            .map(|&dimension| ConfidenceBar {
                dimension,
                pole: mbti.pole_name(dimension),
                percent: prediction.confidence.percent(dimension),
            })
            .collect();

        let mut sections = Vec::new();
        let mut push = |kind: SectionKind, body: SectionBody| {
            let empty = match &body {
                SectionBody::Bullets(items)
                | SectionBody::Numbered(items)
                | SectionBody::Tags(items) => items.is_empty(),
                SectionBody::Matches(cards) => cards.is_empty(),
            };
            if !empty {
                sections.push(ReportSection { kind, body });
            }
        };

        push(SectionKind::Keywords, SectionBody::Tags(non_blank_items(&prediction.metadata.keywords)));
        push(SectionKind::Strengths, SectionBody::Numbered(non_blank_items(&insights.strengths)));
        push(SectionKind::GrowthAreas, SectionBody::Numbered(non_blank_items(&insights.weaknesses)));
        push(SectionKind::Careers, SectionBody::Bullets(non_blank_items(&insights.careers)));
        push(SectionKind::StudyHabits, SectionBody::Bullets(non_blank_items(&insights.study_habits)));
        push(SectionKind::Compatibility, SectionBody::Matches(match_cards(insights)));
        push(SectionKind::GrowthTips, SectionBody::Numbered(non_blank_items(&insights.growth_tips)));
        push(SectionKind::NotableExamples, SectionBody::Tags(non_blank_items(&insights.famous_people)));

        Self {
            mode: prediction.mode,
            headline,
            confidence,
            input_summary: input_summary(prediction),
            sections,
        }
    }

    pub fn section(&self, kind: SectionKind) -> Option<&ReportSection> {
        self.sections.iter().find(|s| s.kind == kind)
    }

    /// Markdown rendition, used for text and HTML export.
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        let h = &self.headline;

        match &h.title {
            Some(title) => {
                let _ = writeln!(out, "# {} - {}", h.mbti_type, md_escape(title));
            }
            None => {
                let _ = writeln!(out, "# {}", h.mbti_type);
            }
        }
        out.push('\n');
        if let Some(description) = &h.description {
            let _ = writeln!(out, "{}\n", md_escape(description));
        }
        if let Some(population) = &h.population {
            let _ = writeln!(out, "*Population: {}*\n", md_escape(population));
        }

        out.push_str("## Confidence Breakdown\n\n");
        for bar in &self.confidence {
            let _ = writeln!(
                out,
                "- **{}** ({}): {}%",
                bar.pole,
                bar.dimension.display_name(),
                bar.percent
            );
        }
        out.push('\n');

        if !self.input_summary.is_empty() {
            out.push_str("## Analysis Details\n\n");
            for item in &self.input_summary {
                let _ = writeln!(out, "- **{}:** {}", item.label, md_escape(&item.value));
            }
            out.push('\n');
        }

        for section in &self.sections {
            let _ = writeln!(out, "## {}\n", section.kind.heading());
            match &section.body {
                SectionBody::Bullets(items) => {
                    for item in items {
                        let _ = writeln!(out, "- {}", md_escape(item));
                    }
                }
                SectionBody::Numbered(items) => {
                    for (i, item) in items.iter().enumerate() {
                        let _ = writeln!(out, "{}. {}", i + 1, md_escape(item));
                    }
                }
                SectionBody::Tags(items) => {
                    let tags: Vec<String> = items.iter().map(|t| md_escape(t)).collect();
                    let _ = writeln!(out, "{}", tags.join(", "));
                }
                SectionBody::Matches(cards) => {
                    for card in cards {
                        match card.score {
                            Some(score) => {
                                let _ = writeln!(
                                    out,
                                    "### {} ({}% Match)\n",
                                    md_escape(&card.mbti_type),
                                    score
                                );
                            }
                            None => {
                                let _ = writeln!(out, "### {}\n", md_escape(&card.mbti_type));
                            }
                        }
                        if let Some(why) = &card.why {
                            let _ = writeln!(out, "{}\n", md_escape(why));
                        }
                        if let Some(challenges) = &card.challenges {
                            let _ = writeln!(out, "**Challenge:** {}\n", md_escape(challenges));
                        }
                    }
                }
            }
            if !out.ends_with("\n\n") {
                out.push('\n');
            }
        }

        out.push_str("---\n\n*Generated by MindMorph - Personality Assessment Platform*\n");
        out
    }
}

/// Makes free text inert inside the generated Markdown.
///
/// Line breaks collapse to spaces so a value can never open a new block, and
/// inline markup, raw HTML and leading list or heading markers are escaped.
fn md_escape(text: &str) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut out = String::with_capacity(flat.len());
    for c in flat.chars() {
        if matches!(
            c,
            '\\' | '`' | '*' | '_' | '[' | ']' | '<' | '>' | '#' | '|' | '~' | '&'
        ) {
            out.push('\\');
        }
        out.push(c);
    }

    // "- x", "+ x" and "1. x" would start a list.
    if out.starts_with('-') || out.starts_with('+') {
        out.insert(0, '\\');
    } else {
        let digits = out.chars().take_while(char::is_ascii_digit).count();
        if digits > 0 && matches!(out[digits..].chars().next(), Some('.') | Some(')')) {
            out.insert(digits, '\\');
        }
    }
    out
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn non_blank_items(items: &[String]) -> Vec<String> {
    items
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn match_cards(insights: &InsightBundle) -> Vec<MatchCard> {
    let Some(compat) = insights.compatibility() else {
        return Vec::new();
    };
    compat
        .matches()
        .map(|(code, detail)| MatchCard {
            mbti_type: code.to_string(),
            score: detail
                .and_then(|d| d.score)
                .map(|s| s.clamp(0.0, 100.0).round() as u8),
            why: detail.and_then(|d| non_blank(&d.why)),
            challenges: detail.and_then(|d| non_blank(&d.challenges)),
        })
        .collect()
}

fn input_summary(prediction: &Prediction) -> Vec<SummaryItem> {
    let meta = &prediction.metadata;
    let mut items = Vec::new();

    if let Some(at) = meta.timestamp {
        items.push(SummaryItem { label: "Analyzed", value: at.to_string() });
    }
    match prediction.mode {
        AssessmentMode::Questionnaire => {
            items.push(SummaryItem {
                label: "Method",
                value: AssessmentMode::Questionnaire.label().to_string(),
            });
        }
        AssessmentMode::Text => {
            if let Some(len) = meta.text_length {
                items.push(SummaryItem { label: "Characters analyzed", value: len.to_string() });
            }
            if let Some(snippet) = non_blank(&meta.text_snippet) {
                items.push(SummaryItem { label: "Text excerpt", value: snippet });
            }
        }
        AssessmentMode::Twitter => {
            if let Some(username) = non_blank(&meta.username) {
                items.push(SummaryItem { label: "Username", value: format!("@{}", username) });
            }
            if let Some(count) = meta.tweet_count {
                items.push(SummaryItem { label: "Tweets analyzed", value: count.to_string() });
            }
            if let Some(chars) = meta.characters() {
                items.push(SummaryItem { label: "Characters analyzed", value: chars.to_string() });
            }
            if let Some(source) = &meta.source {
                items.push(SummaryItem { label: "Data source", value: source.label().to_string() });
            }
        }
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::assessment::{
        Compatibility, CompatibilityDetail, ConfidenceScores, DataSource, InputMetadata,
    };
    use crate::domain::foundation::PredictionId;
    use std::collections::BTreeMap;

    fn prediction(mode: AssessmentMode) -> Prediction {
        Prediction {
            id: PredictionId::new("abc123").unwrap(),
            mode,
            mbti_type: MbtiType::parse("INFJ").unwrap(),
            confidence: ConfidenceScores::new(0.72, 0.66, 0.5, 0.81).unwrap(),
            metadata: InputMetadata {
                keywords: vec!["empathy".into(), "  ".into(), "vision".into()],
                username: Some("elonmusk".into()),
                tweet_count: Some(50),
                total_characters: Some(6400),
                source: Some(DataSource::MockApi),
                ..Default::default()
            },
        }
    }

    fn insights() -> InsightBundle {
        InsightBundle {
            title: Some("The Advocate".into()),
            percentage: Some("1-3%".into()),
            description: Some("Quiet and mystical.".into()),
            strengths: vec!["Insightful".into()],
            weaknesses: vec!["Perfectionistic".into()],
            careers: vec!["Counselor".into()],
            growth_tips: vec!["Set boundaries".into()],
            famous_people: vec!["Martin Luther King Jr.".into(), "Nelson Mandela".into()],
            ..Default::default()
        }
    }

    #[test]
    fn confidence_bars_follow_type_letters() {
        let view = ReportView::render(&prediction(AssessmentMode::Text), &insights());
        let poles: Vec<&str> = view.confidence.iter().map(|b| b.pole).collect();
        assert_eq!(poles, vec!["Introversion", "Intuition", "Feeling", "Judging"]);
        assert_eq!(view.confidence[1].percent, 66);
    }

    #[test]
    fn absent_fields_are_omitted_not_placeholdered() {
        let view = ReportView::render(&prediction(AssessmentMode::Text), &insights());
        assert!(view.section(SectionKind::StudyHabits).is_none());
        assert!(view.section(SectionKind::Compatibility).is_none());
        assert!(view.section(SectionKind::Strengths).is_some());

        let sparse = ReportView::render(&prediction(AssessmentMode::Text), &InsightBundle::default());
        assert!(sparse.headline.title.is_none());
        assert_eq!(sparse.sections.len(), 1); // keywords only
    }

    #[test]
    fn blank_keywords_are_dropped() {
        let view = ReportView::render(&prediction(AssessmentMode::Text), &insights());
        assert_eq!(
            view.section(SectionKind::Keywords).unwrap().body,
            SectionBody::Tags(vec!["empathy".into(), "vision".into()])
        );
    }

    #[test]
    fn markdown_escapes_free_text() {
        let mut bundle = insights();
        bundle.description = Some("1. not a list\n\n## nor a heading".into());
        bundle.strengths = vec!["[click](http://x) <b>bold</b>".into()];

        let md = ReportView::render(&prediction(AssessmentMode::Text), &bundle).to_markdown();

        assert!(md.contains("1\\. not a list \\#\\# nor a heading\n"));
        assert!(md.contains("1. \\[click\\](http://x) \\<b\\>bold\\</b\\>\n"));
        assert!(!md.contains("\n## nor a heading"));
    }

    #[test]
    fn twitter_summary_lists_handle_and_source() {
        let view = ReportView::render(&prediction(AssessmentMode::Twitter), &insights());
        let labels: Vec<&str> = view.input_summary.iter().map(|i| i.label).collect();
        assert_eq!(
            labels,
            vec!["Username", "Tweets analyzed", "Characters analyzed", "Data source"]
        );
        assert_eq!(view.input_summary[0].value, "@elonmusk");
    }

    #[test]
    fn compatibility_cards_keep_rank_and_round_scores() {
        let mut bundle = insights();
        let mut details = BTreeMap::new();
        details.insert(
            "ENFP".to_string(),
            CompatibilityDetail {
                score: Some(94.6),
                why: Some("Balance".into()),
                challenges: None,
            },
        );
        bundle.compatibility = Some(Compatibility {
            best_matches: vec!["ENFP".into(), "ENTP".into()],
            details,
        });

        let view = ReportView::render(&prediction(AssessmentMode::Questionnaire), &bundle);
        let SectionBody::Matches(cards) = &view.section(SectionKind::Compatibility).unwrap().body
        else {
            panic!("expected match cards");
        };
        assert_eq!(cards[0].score, Some(95));
        assert_eq!(cards[1].mbti_type, "ENTP");
        assert!(cards[1].why.is_none());
    }

    #[test]
    fn markdown_contains_headline_and_sections() {
        let md = ReportView::render(&prediction(AssessmentMode::Text), &insights()).to_markdown();
        assert!(md.starts_with("# INFJ - The Advocate\n"));
        assert!(md.contains("- **Introversion** (Energy): 72%"));
        assert!(md.contains("## Strengths\n\n1. Insightful\n"));
        assert!(md.contains("Martin Luther King Jr., Nelson Mandela"));
        assert!(!md.contains("Study Habits"));
    }
}
