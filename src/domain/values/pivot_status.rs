use crate::domain::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PivotStatus {
    Consistent,
    ExpandingScope,
    MajorPivotDetected,
    DeepeningExpertise,
    NewUser,
}

impl PivotStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PivotStatus::Consistent => "consistent",
            PivotStatus::ExpandingScope => "expanding_scope",
            PivotStatus::MajorPivotDetected => "major_pivot_detected",
            PivotStatus::DeepeningExpertise => "deepening_expertise",
            PivotStatus::NewUser => "new_user",
        }
    }
}

impl fmt::Display for PivotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PivotStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "consistent" => Ok(PivotStatus::Consistent),
            "expanding_scope" => Ok(PivotStatus::ExpandingScope),
            "major_pivot_detected" => Ok(PivotStatus::MajorPivotDetected),
            "deepening_expertise" => Ok(PivotStatus::DeepeningExpertise),
            "new_user" => Ok(PivotStatus::NewUser),
            _ => Err(ValidationError::UnknownVariant {
                field: "pivot status",
                value: s.to_string(),
            }),
        }
    }
}
