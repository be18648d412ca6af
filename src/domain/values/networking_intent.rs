use crate::domain::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetworkingIntent {
    ActivelyLooking,
    OpenToOpportunities,
    NotInterested,
    Hiring,
    SeekingCofounder,
    FreelanceAvailable,
    InStealthMode,
}

impl NetworkingIntent {
    pub const ALL: [NetworkingIntent; 7] = [
        NetworkingIntent::ActivelyLooking,
        NetworkingIntent::OpenToOpportunities,
        NetworkingIntent::NotInterested,
        NetworkingIntent::Hiring,
        NetworkingIntent::SeekingCofounder,
        NetworkingIntent::FreelanceAvailable,
        NetworkingIntent::InStealthMode,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NetworkingIntent::ActivelyLooking => "actively_looking",
            NetworkingIntent::OpenToOpportunities => "open_to_opportunities",
            NetworkingIntent::NotInterested => "not_interested",
            NetworkingIntent::Hiring => "hiring",
            NetworkingIntent::SeekingCofounder => "seeking_cofounder",
            NetworkingIntent::FreelanceAvailable => "freelance_available",
            NetworkingIntent::InStealthMode => "in_stealth_mode",
        }
    }

    pub fn spoken(&self) -> String {
        self.as_str().replace('_', " ")
    }

    /// Intents that answer a "we're hiring" query.
    pub fn is_job_seeking(&self) -> bool {
        matches!(
            self,
            NetworkingIntent::ActivelyLooking | NetworkingIntent::OpenToOpportunities
        )
    }
}

impl fmt::Display for NetworkingIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for NetworkingIntent {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        NetworkingIntent::ALL
            .into_iter()
            .find(|intent| intent.as_str() == lower)
            .ok_or_else(|| ValidationError::UnknownVariant {
                field: "networking intent",
                value: s.to_string(),
            })
    }
}
