use crate::domain::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which profile text an index was built from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentMode {
    /// Bio plus conversations; the same text the brute-force path embeds.
    #[default]
    Plain,
    /// Weighted document repeating domains, skills, role and intent.
    Enriched,
}

impl fmt::Display for DocumentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentMode::Plain => write!(f, "plain"),
            DocumentMode::Enriched => write!(f, "enriched"),
        }
    }
}

impl FromStr for DocumentMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "plain" => Ok(DocumentMode::Plain),
            "enriched" => Ok(DocumentMode::Enriched),
            _ => Err(ValidationError::UnknownVariant {
                field: "document mode",
                value: s.to_string(),
            }),
        }
    }
}
