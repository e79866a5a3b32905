//! Personality insights attached to a prediction.
//!
//! The backend looks insights up by MBTI type and every field may be missing
//! or `null`; consumers treat absent and empty the same way.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Compatibility notes for one partner type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompatibilityDetail {
    /// Match score as a percentage.
    pub score: Option<f64>,
    pub why: Option<String>,
    pub challenges: Option<String>,
}

/// Best matches plus per-type detail.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Compatibility {
    #[serde(default, deserialize_with = "list_or_null")]
    pub best_matches: Vec<String>,
    #[serde(default, rename = "compatibility")]
    pub details: BTreeMap<String, CompatibilityDetail>,
}

impl Compatibility {
    /// Best matches in ranked order with whatever detail exists for each.
    pub fn matches(&self) -> impl Iterator<Item = (&str, Option<&CompatibilityDetail>)> {
        self.best_matches
            .iter()
            .map(move |code| (code.as_str(), self.details.get(code)))
    }

    pub fn is_empty(&self) -> bool {
        self.best_matches.is_empty()
    }
}

/// Descriptive content for an MBTI type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InsightBundle {
    pub title: Option<String>,
    /// Share of the population, as the backend phrases it (e.g. "2-4%").
    #[serde(default, deserialize_with = "text_or_number")]
    pub percentage: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "list_or_null")]
    pub strengths: Vec<String>,
    /// Growth areas.
    #[serde(default, deserialize_with = "list_or_null")]
    pub weaknesses: Vec<String>,
    #[serde(default, deserialize_with = "list_or_null")]
    pub careers: Vec<String>,
    #[serde(default, deserialize_with = "list_or_null")]
    pub study_habits: Vec<String>,
    pub compatibility: Option<Compatibility>,
    #[serde(default, deserialize_with = "list_or_null")]
    pub growth_tips: Vec<String>,
    /// Notable examples.
    #[serde(default, deserialize_with = "list_or_null")]
    pub famous_people: Vec<String>,
}

impl InsightBundle {
    /// Compatibility data, if any best matches are present.
    pub fn compatibility(&self) -> Option<&Compatibility> {
        self.compatibility.as_ref().filter(|c| !c.is_empty())
    }

    /// Names of required report fields that are absent or empty.
    pub fn missing_report_fields(&self) -> Vec<&'static str> {
        let text_missing = |v: &Option<String>| v.as_deref().map_or(true, |s| s.trim().is_empty());

        let mut missing = Vec::new();
        if text_missing(&self.title) {
            missing.push("title");
        }
        if text_missing(&self.description) {
            missing.push("description");
        }
        if self.strengths.is_empty() {
            missing.push("strengths");
        }
        if self.weaknesses.is_empty() {
            missing.push("weaknesses");
        }
        if self.careers.is_empty() {
            missing.push("careers");
        }
        if self.growth_tips.is_empty() {
            missing.push("growth_tips");
        }
        if self.famous_people.is_empty() {
            missing.push("famous_people");
        }
        missing
    }
}

fn list_or_null<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrNumber {
    Text(String),
    Int(i64),
    Float(f64),
}

fn text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<TextOrNumber>::deserialize(deserializer)?.map(|v| match v {
        TextOrNumber::Text(s) => s,
        TextOrNumber::Int(n) => format!("{}%", n),
        TextOrNumber::Float(n) => format!("{}%", n),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tolerates_missing_and_null_fields() {
        let bundle: InsightBundle =
            serde_json::from_str(r#"{"title": "The Architect", "strengths": null}"#).unwrap();
        assert_eq!(bundle.title.as_deref(), Some("The Architect"));
        assert!(bundle.strengths.is_empty());
        assert!(bundle.compatibility().is_none());
    }

    #[test]
    fn numeric_percentage_is_rendered_as_text() {
        let bundle: InsightBundle = serde_json::from_str(r#"{"percentage": 3}"#).unwrap();
        assert_eq!(bundle.percentage.as_deref(), Some("3%"));
        let bundle: InsightBundle = serde_json::from_str(r#"{"percentage": "2-4%"}"#).unwrap();
        assert_eq!(bundle.percentage.as_deref(), Some("2-4%"));
    }

    #[test]
    fn compatibility_matches_keep_ranking_order() {
        let json = r#"{
            "best_matches": ["ENFP", "ENTP"],
            "compatibility": {
                "ENTP": {"score": 88, "why": "Shared curiosity", "challenges": "Follow-through"},
                "ENFP": {"score": 95, "why": "Complementary energy", "challenges": "Planning"}
            }
        }"#;
        let compat: Compatibility = serde_json::from_str(json).unwrap();
        let codes: Vec<&str> = compat.matches().map(|(code, _)| code).collect();
        assert_eq!(codes, vec!["ENFP", "ENTP"]);
        assert_eq!(compat.matches().next().unwrap().1.unwrap().score, Some(95.0));
    }

    #[test]
    fn missing_report_fields_lists_each_gap() {
        let bundle = InsightBundle {
            title: Some("The Architect".into()),
            description: Some("  ".into()),
            strengths: vec!["Strategic".into()],
            ..Default::default()
        };
        assert_eq!(
            bundle.missing_report_fields(),
            vec!["description", "weaknesses", "careers", "growth_tips", "famous_people"]
        );
    }
}
