use crate::domain::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillLevel {
    Novice,
    Intermediate,
    Expert,
}

impl SkillLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkillLevel::Novice => "novice",
            SkillLevel::Intermediate => "intermediate",
            SkillLevel::Expert => "expert",
        }
    }

    /// How many times the skill is repeated in an enriched index document.
    pub fn document_weight(&self) -> usize {
        match self {
            SkillLevel::Expert => 3,
            SkillLevel::Intermediate => 2,
            SkillLevel::Novice => 1,
        }
    }
}

impl fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SkillLevel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "novice" => Ok(SkillLevel::Novice),
            "intermediate" => Ok(SkillLevel::Intermediate),
            "expert" => Ok(SkillLevel::Expert),
            _ => Err(ValidationError::UnknownVariant {
                field: "skill level",
                value: s.to_string(),
            }),
        }
    }
}
