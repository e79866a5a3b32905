//! MBTI type codes and their dimensions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// One of the four MBTI preference axes.
///
/// Serialized as the two-letter axis code the backend uses (`IE`, `NS`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Dimension {
    IE,
    NS,
    TF,
    JP,
}

impl Dimension {
    /// All dimensions in type-code order.
    pub const ALL: [Dimension; 4] = [Dimension::IE, Dimension::NS, Dimension::TF, Dimension::JP];

    /// Two-letter axis code.
    pub fn code(&self) -> &'static str {
        match self {
            Dimension::IE => "IE",
            Dimension::NS => "NS",
            Dimension::TF => "TF",
            Dimension::JP => "JP",
        }
    }

    /// Display name shown next to questions of this dimension.
    pub fn display_name(&self) -> &'static str {
        match self {
            Dimension::IE => "Energy",
            Dimension::NS => "Information",
            Dimension::TF => "Decisions",
            Dimension::JP => "Lifestyle",
        }
    }

    /// The two letters of this axis.
    pub fn poles(&self) -> (char, char) {
        match self {
            Dimension::IE => ('I', 'E'),
            Dimension::NS => ('N', 'S'),
            Dimension::TF => ('T', 'F'),
            Dimension::JP => ('J', 'P'),
        }
    }

    /// Position of this dimension's letter within a type code.
    pub fn position(&self) -> usize {
        match self {
            Dimension::IE => 0,
            Dimension::NS => 1,
            Dimension::TF => 2,
            Dimension::JP => 3,
        }
    }

    /// Full name of a pole letter, e.g. `I` -> "Introversion".
    pub fn pole_name(letter: char) -> Option<&'static str> {
        match letter {
            'I' => Some("Introversion"),
            'E' => Some("Extraversion"),
            'N' => Some("Intuition"),
            'S' => Some("Sensing"),
            'T' => Some("Thinking"),
            'F' => Some("Feeling"),
            'J' => Some("Judging"),
            'P' => Some("Perceiving"),
            _ => None,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Validated four-letter MBTI type, e.g. `INTJ`.
///
/// Input is case-insensitive; the stored form is always upper case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MbtiType([u8; 4]);

impl MbtiType {
    /// Parses and validates a type code.
    pub fn parse(code: &str) -> Result<Self, ValidationError> {
        let upper = code.trim().to_ascii_uppercase();
        let bytes = upper.as_bytes();
        if bytes.len() != 4 {
            return Err(ValidationError::invalid_format(
                "mbti_type",
                format!("'{}' must have exactly four letters", code),
            ));
        }

        let mut letters = [0u8; 4];
        for dimension in Dimension::ALL {
            let letter = bytes[dimension.position()];
            let (first, second) = dimension.poles();
            if letter != first as u8 && letter != second as u8 {
                return Err(ValidationError::invalid_format(
                    "mbti_type",
                    format!(
                        "'{}' letter {} must be {} or {}",
                        code,
                        dimension.position() + 1,
                        first,
                        second
                    ),
                ));
            }
            letters[dimension.position()] = letter;
        }
        Ok(Self(letters))
    }

    /// Letter chosen on the given dimension.
    pub fn letter(&self, dimension: Dimension) -> char {
        self.0[dimension.position()] as char
    }

    /// Full pole name on the given dimension, e.g. "Introversion".
    pub fn pole_name(&self, dimension: Dimension) -> &'static str {
        // Letters are validated on construction, so a name always exists.
        Dimension::pole_name(self.letter(dimension)).unwrap_or("")
    }

    /// The type code as a string.
    pub fn as_string(&self) -> String {
        self.0.iter().map(|b| *b as char).collect()
    }
}

impl fmt::Display for MbtiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.0 {
            write!(f, "{}", b as char)?;
        }
        Ok(())
    }
}

impl FromStr for MbtiType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for MbtiType {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<MbtiType> for String {
    fn from(t: MbtiType) -> Self {
        t.as_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_normalizes_case() {
        let t = MbtiType::parse("intj").unwrap();
        assert_eq!(t.to_string(), "INTJ");
        assert_eq!(t.letter(Dimension::NS), 'N');
    }

    #[test]
    fn parse_rejects_wrong_length() {
        assert!(MbtiType::parse("INT").is_err());
        assert!(MbtiType::parse("INTJX").is_err());
    }

    #[test]
    fn parse_rejects_letter_from_wrong_axis() {
        // N belongs to the second position, not the first.
        assert!(MbtiType::parse("NITJ").is_err());
        assert!(MbtiType::parse("ENXP").is_err());
    }

    #[test]
    fn pole_names_follow_letters() {
        let t = MbtiType::parse("ESFP").unwrap();
        assert_eq!(t.pole_name(Dimension::IE), "Extraversion");
        assert_eq!(t.pole_name(Dimension::NS), "Sensing");
        assert_eq!(t.pole_name(Dimension::TF), "Feeling");
        assert_eq!(t.pole_name(Dimension::JP), "Perceiving");
    }

    #[test]
    fn serde_uses_plain_string() {
        let t: MbtiType = serde_json::from_str("\"enfp\"").unwrap();
        assert_eq!(serde_json::to_string(&t).unwrap(), "\"ENFP\"");
        assert!(serde_json::from_str::<MbtiType>("\"ABCD\"").is_err());
    }

    #[test]
    fn dimension_display_names() {
        assert_eq!(Dimension::IE.display_name(), "Energy");
        assert_eq!(Dimension::NS.display_name(), "Information");
        assert_eq!(Dimension::TF.display_name(), "Decisions");
        assert_eq!(Dimension::JP.display_name(), "Lifestyle");
    }
}
