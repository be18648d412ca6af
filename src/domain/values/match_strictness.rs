use crate::domain::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How keyword tables are matched against query text.
///
/// `Substring` is the historical behaviour: "airport" contains the keyword
/// "ai". `WordBoundary` only accepts whole-word (or whole-phrase) hits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrictness {
    #[default]
    Substring,
    WordBoundary,
}

impl MatchStrictness {
    /// Whether `needle` occurs in `haystack` under this strictness.
    /// Both sides are expected to be lowercase already.
    pub fn contains(&self, haystack: &str, needle: &str) -> bool {
        if needle.is_empty() {
            return false;
        }
        match self {
            MatchStrictness::Substring => haystack.contains(needle),
            MatchStrictness::WordBoundary => haystack.match_indices(needle).any(|(start, _)| {
                let end = start + needle.len();
                let before_ok = haystack[..start]
                    .chars()
                    .next_back()
                    .map_or(true, |c| !c.is_alphanumeric());
                let after_ok = haystack[end..]
                    .chars()
                    .next()
                    .map_or(true, |c| !c.is_alphanumeric());
                before_ok && after_ok
            }),
        }
    }
}

impl fmt::Display for MatchStrictness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchStrictness::Substring => write!(f, "substring"),
            MatchStrictness::WordBoundary => write!(f, "word_boundary"),
        }
    }
}

impl FromStr for MatchStrictness {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "substring" => Ok(MatchStrictness::Substring),
            "word_boundary" | "word" => Ok(MatchStrictness::WordBoundary),
            _ => Err(ValidationError::UnknownVariant {
                field: "match strictness",
                value: s.to_string(),
            }),
        }
    }
}
