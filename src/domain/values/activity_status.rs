use serde::{Deserialize, Serialize};
use std::fmt;

/// Recency bucket derived from a profile's last-active date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityStatus {
    /// Seen within the last 7 days
    Active,
    /// 7 to 20 days
    Recent,
    /// Older, or no parseable date
    Inactive,
}

impl ActivityStatus {
    pub fn from_days(days: Option<i64>) -> Self {
        match days {
            Some(d) if d < 7 => ActivityStatus::Active,
            Some(d) if d <= 20 => ActivityStatus::Recent,
            _ => ActivityStatus::Inactive,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityStatus::Active => "active",
            ActivityStatus::Recent => "recent",
            ActivityStatus::Inactive => "inactive",
        }
    }
}

impl fmt::Display for ActivityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_boundaries() {
        assert_eq!(ActivityStatus::from_days(Some(0)), ActivityStatus::Active);
        assert_eq!(ActivityStatus::from_days(Some(6)), ActivityStatus::Active);
        assert_eq!(ActivityStatus::from_days(Some(7)), ActivityStatus::Recent);
        assert_eq!(ActivityStatus::from_days(Some(20)), ActivityStatus::Recent);
        assert_eq!(ActivityStatus::from_days(Some(21)), ActivityStatus::Inactive);
    }

    #[test]
    fn test_unknown_date_is_inactive() {
        assert_eq!(ActivityStatus::from_days(None), ActivityStatus::Inactive);
    }
}
