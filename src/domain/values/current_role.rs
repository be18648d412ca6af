use crate::domain::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurrentRole {
    TechnicalFounder,
    BusinessFounder,
    TechnicalResearcher,
    ProductManager,
    Engineer,
    TechnicalJunior,
    MarketingExecutive,
    TechnicalSpecialist,
    Designer,
    Marketer,
    Investor,
    Consultant,
}

impl CurrentRole {
    pub const ALL: [CurrentRole; 12] = [
        CurrentRole::TechnicalFounder,
        CurrentRole::BusinessFounder,
        CurrentRole::TechnicalResearcher,
        CurrentRole::ProductManager,
        CurrentRole::Engineer,
        CurrentRole::TechnicalJunior,
        CurrentRole::MarketingExecutive,
        CurrentRole::TechnicalSpecialist,
        CurrentRole::Designer,
        CurrentRole::Marketer,
        CurrentRole::Investor,
        CurrentRole::Consultant,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CurrentRole::TechnicalFounder => "technical_founder",
            CurrentRole::BusinessFounder => "business_founder",
            CurrentRole::TechnicalResearcher => "technical_researcher",
            CurrentRole::ProductManager => "product_manager",
            CurrentRole::Engineer => "engineer",
            CurrentRole::TechnicalJunior => "technical_junior",
            CurrentRole::MarketingExecutive => "marketing_executive",
            CurrentRole::TechnicalSpecialist => "technical_specialist",
            CurrentRole::Designer => "designer",
            CurrentRole::Marketer => "marketer",
            CurrentRole::Investor => "investor",
            CurrentRole::Consultant => "consultant",
        }
    }

    /// Human form used in embedding documents ("technical founder").
    pub fn spoken(&self) -> String {
        self.as_str().replace('_', " ")
    }
}

impl fmt::Display for CurrentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CurrentRole {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        CurrentRole::ALL
            .into_iter()
            .find(|role| role.as_str() == lower)
            .ok_or_else(|| ValidationError::UnknownVariant {
                field: "current role",
                value: s.to_string(),
            })
    }
}
