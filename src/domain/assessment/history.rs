//! Prediction history for one assessment mode.

use super::{MbtiType, Prediction};

/// Summary figures shown above a history list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryStats {
    pub count: usize,
    pub total_characters: usize,
    pub latest_type: MbtiType,
}

/// A mode's history. An empty history is a normal state, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryView {
    Empty,
    /// Most recent first.
    Entries(Vec<Prediction>),
}

impl HistoryView {
    /// Builds a view, ordering entries by timestamp descending.
    ///
    /// Entries without a timestamp sort last; ties keep backend order.
    pub fn from_predictions(mut predictions: Vec<Prediction>) -> Self {
        if predictions.is_empty() {
            return HistoryView::Empty;
        }
        predictions.sort_by(|a, b| b.metadata.timestamp.cmp(&a.metadata.timestamp));
        HistoryView::Entries(predictions)
    }

    pub fn entries(&self) -> &[Prediction] {
        match self {
            HistoryView::Empty => &[],
            HistoryView::Entries(entries) => entries,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, HistoryView::Empty)
    }

    /// Count, characters analyzed, and latest type; `None` when empty.
    pub fn stats(&self) -> Option<HistoryStats> {
        let entries = self.entries();
        let latest = entries.first()?;
        Some(HistoryStats {
            count: entries.len(),
            total_characters: entries
                .iter()
                .filter_map(|p| p.metadata.characters())
                .sum(),
            latest_type: latest.mbti_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::assessment::{AssessmentMode, ConfidenceScores, InputMetadata};
    use crate::domain::foundation::{PredictionId, Timestamp};

    fn prediction(id: &str, mbti: &str, at: Option<&str>, chars: Option<usize>) -> Prediction {
        Prediction {
            id: PredictionId::new(id).unwrap(),
            mode: AssessmentMode::Text,
            mbti_type: MbtiType::parse(mbti).unwrap(),
            confidence: ConfidenceScores::new(0.6, 0.6, 0.6, 0.6).unwrap(),
            metadata: InputMetadata {
                timestamp: at.map(|t| Timestamp::parse(t).unwrap()),
                text_length: chars,
                ..Default::default()
            },
        }
    }

    #[test]
    fn empty_list_is_empty_state() {
        let view = HistoryView::from_predictions(vec![]);
        assert!(view.is_empty());
        assert!(view.stats().is_none());
    }

    #[test]
    fn entries_are_sorted_most_recent_first() {
        let view = HistoryView::from_predictions(vec![
            prediction("a", "INTJ", Some("2026-10-01T08:00:00Z"), Some(120)),
            prediction("b", "ENFP", None, None),
            prediction("c", "ISTP", Some("2026-10-15T08:00:00Z"), Some(300)),
        ]);
        let ids: Vec<&str> = view.entries().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn stats_sum_characters_and_take_latest_type() {
        let view = HistoryView::from_predictions(vec![
            prediction("a", "INTJ", Some("2026-10-01T08:00:00Z"), Some(120)),
            prediction("c", "ISTP", Some("2026-10-15T08:00:00Z"), Some(300)),
        ]);
        let stats = view.stats().unwrap();
        assert_eq!(stats.count, 2);
        assert_eq!(stats.total_characters, 420);
        assert_eq!(stats.latest_type.to_string(), "ISTP");
    }
}
