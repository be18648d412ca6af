use crate::domain::error::ValidationError;
use crate::domain::values::activity_status::ActivityStatus;
use crate::domain::values::current_role::CurrentRole;
use crate::domain::values::experience_level::ExperienceLevel;
use crate::domain::values::networking_intent::NetworkingIntent;
use crate::domain::values::pivot_status::PivotStatus;
use crate::domain::values::skill_level::SkillLevel;
use crate::domain::values::user_status::UserStatus;
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type ProfileId = i64;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub text: String,
    /// ISO date (YYYY-MM-DD)
    pub timestamp: String,
}

impl Conversation {
    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.timestamp, DATE_FORMAT).ok()
    }
}

/// A user profile as loaded from the static profile batch.
///
/// Profiles are never mutated after loading; the cache hands them out behind `Arc`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: ProfileId,
    pub name: String,
    pub bio: String,
    pub location: String,
    pub user_status: UserStatus,
    pub current_role: CurrentRole,
    pub experience_level: ExperienceLevel,
    pub networking_intent: NetworkingIntent,
    pub pivot_status: PivotStatus,
    pub domain_expertise: Vec<String>,
    pub skill_levels: BTreeMap<String, SkillLevel>,
    #[serde(default)]
    pub remote_preference: String,
    #[serde(default)]
    pub conversations: Vec<Conversation>,
    /// ISO date (YYYY-MM-DD) of the last activity
    pub last_active: String,
}

impl Profile {
    /// Parse and validate one raw profile record.
    pub fn from_value(value: serde_json::Value) -> Result<Self, ValidationError> {
        let profile: Profile =
            serde_json::from_value(value).map_err(|e| ValidationError::Profile(e.to_string()))?;
        profile.validate()?;
        Ok(profile)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::Profile(format!(
                "profile {} has an empty name",
                self.id
            )));
        }
        Ok(())
    }

    pub fn last_active_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.last_active, DATE_FORMAT).ok()
    }

    pub fn days_since_last_active(&self, today: NaiveDate) -> Option<i64> {
        self.last_active_date().map(|d| (today - d).num_days())
    }

    pub fn activity_status(&self, today: NaiveDate) -> ActivityStatus {
        ActivityStatus::from_days(self.days_since_last_active(today))
    }

    pub fn activity_display(&self, today: NaiveDate) -> String {
        let Some(days) = self.days_since_last_active(today) else {
            return "Activity unknown".to_string();
        };
        let plural = |n: i64| if n > 1 { "s" } else { "" };
        match days {
            0 => "Active today".to_string(),
            1 => "Active yesterday".to_string(),
            d if d < 7 => format!("Active {d} day{} ago", plural(d)),
            d if d < 30 => {
                let weeks = d / 7;
                format!("Active {weeks} week{} ago", plural(weeks))
            }
            d if d < 365 => {
                let months = d / 30;
                format!("Active {months} month{} ago", plural(months))
            }
            d => {
                let months = d / 30;
                format!("Inactive for {months} month{}", plural(months))
            }
        }
    }

    pub fn conversation_count(&self) -> usize {
        self.conversations.len()
    }

    /// Text embedded by the brute-force search path: bio followed by every conversation.
    pub fn embedding_text(&self) -> String {
        if self.conversations.is_empty() {
            return self.bio.clone();
        }
        let all: Vec<&str> = self.conversations.iter().map(|c| c.text.as_str()).collect();
        format!("{} {}", self.bio, all.join(" "))
    }

    /// Weighted document for enriched index builds. Domains, skills, role,
    /// experience and intent are repeated so they dominate the embedding.
    pub fn enriched_document(&self) -> String {
        let mut parts: Vec<String> = vec![self.bio.clone()];

        let domains = self.domain_expertise.join(" ");
        if !domains.is_empty() {
            parts.extend(std::iter::repeat(domains).take(5));
        }

        for (skill, level) in &self.skill_levels {
            let token = match level {
                SkillLevel::Novice => skill.clone(),
                _ => format!("{skill} {level}"),
            };
            parts.extend(std::iter::repeat(token).take(level.document_weight()));
        }

        let role = self.current_role.spoken();
        parts.extend([role.clone(), role]);
        let experience = self.experience_level.to_string();
        parts.extend([experience.clone(), experience]);
        let intent = self.networking_intent.spoken();
        parts.extend([intent.clone(), intent]);

        parts.extend(self.conversations.iter().take(2).map(|c| c.text.clone()));

        if !self.location.is_empty() {
            parts.push(self.location.clone());
        }
        if !self.last_active.is_empty() {
            parts.push(format!("Last active on {}", self.last_active));
        }

        parts.join(" ")
    }

    /// Conversations dated within `days` of `today`. When none qualify, the
    /// three most recent conversations are returned instead.
    pub fn recent_conversations(&self, today: NaiveDate, days: i64) -> Vec<&Conversation> {
        let cutoff = today - Duration::days(days);
        let recent: Vec<&Conversation> = self
            .conversations
            .iter()
            .filter(|c| c.date().is_some_and(|d| d >= cutoff))
            .collect();
        if !recent.is_empty() {
            return recent;
        }
        let mut by_time: Vec<&Conversation> = self.conversations.iter().collect();
        by_time.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        by_time.truncate(3);
        by_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record() -> serde_json::Value {
        json!({
            "id": 7,
            "name": "Priya",
            "bio": "Payments engineer",
            "location": "London",
            "user_status": "active",
            "current_role": "technical_founder",
            "experience_level": "senior",
            "networking_intent": "seeking_cofounder",
            "pivot_status": "consistent",
            "domain_expertise": ["fintech"],
            "skill_levels": {"payments": "expert", "rust": "intermediate", "sql": "novice"},
            "remote_preference": "hybrid",
            "conversations": [
                {"text": "Scaling card issuing", "timestamp": "2024-05-01"},
                {"text": "Ledger design notes", "timestamp": "2024-05-20"},
                {"text": "Hiring a first engineer", "timestamp": "2024-04-02"}
            ],
            "last_active": "2024-05-28"
        })
    }

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    #[test]
    fn test_from_value_parses_enums() {
        let p = Profile::from_value(record()).unwrap();
        assert_eq!(p.current_role, CurrentRole::TechnicalFounder);
        assert_eq!(p.skill_levels["payments"], SkillLevel::Expert);
        assert_eq!(p.conversation_count(), 3);
    }

    #[test]
    fn test_unknown_enum_value_is_rejected() {
        let mut raw = record();
        raw["networking_intent"] = json!("browsing");
        let err = Profile::from_value(raw).unwrap_err();
        assert!(matches!(err, ValidationError::Profile(msg) if msg.contains("browsing")));
    }

    #[test]
    fn test_unknown_skill_level_is_rejected() {
        let mut raw = record();
        raw["skill_levels"] = json!({"go": "guru"});
        assert!(Profile::from_value(raw).is_err());
    }

    #[test]
    fn test_blank_name_is_rejected() {
        let mut raw = record();
        raw["name"] = json!("  ");
        assert!(Profile::from_value(raw).is_err());
    }

    #[test]
    fn test_activity_status_and_display() {
        let p = Profile::from_value(record()).unwrap();
        assert_eq!(p.activity_status(day("2024-05-28")), ActivityStatus::Active);
        assert_eq!(p.activity_display(day("2024-05-28")), "Active today");
        assert_eq!(p.activity_display(day("2024-05-29")), "Active yesterday");
        assert_eq!(p.activity_display(day("2024-06-01")), "Active 4 days ago");
        assert_eq!(p.activity_status(day("2024-06-10")), ActivityStatus::Recent);
        assert_eq!(p.activity_display(day("2024-06-10")), "Active 1 week ago");
        assert_eq!(p.activity_status(day("2024-07-28")), ActivityStatus::Inactive);
        assert_eq!(p.activity_display(day("2024-07-28")), "Active 2 months ago");
        assert_eq!(p.activity_display(day("2025-07-28")), "Inactive for 14 months");
    }

    #[test]
    fn test_unparseable_date() {
        let mut raw = record();
        raw["last_active"] = json!("last tuesday");
        let p = Profile::from_value(raw).unwrap();
        assert_eq!(p.activity_status(day("2024-05-28")), ActivityStatus::Inactive);
        assert_eq!(p.activity_display(day("2024-05-28")), "Activity unknown");
    }

    #[test]
    fn test_embedding_text_joins_conversations() {
        let p = Profile::from_value(record()).unwrap();
        assert_eq!(
            p.embedding_text(),
            "Payments engineer Scaling card issuing Ledger design notes Hiring a first engineer"
        );
    }

    #[test]
    fn test_embedding_text_without_conversations() {
        let mut raw = record();
        raw["conversations"] = json!([]);
        let p = Profile::from_value(raw).unwrap();
        assert_eq!(p.embedding_text(), "Payments engineer");
    }

    #[test]
    fn test_enriched_document_weights() {
        let p = Profile::from_value(record()).unwrap();
        let doc = p.enriched_document();
        assert_eq!(doc.matches("fintech").count(), 5);
        assert_eq!(doc.matches("payments expert").count(), 3);
        assert_eq!(doc.matches("rust intermediate").count(), 2);
        assert_eq!(doc.matches("technical founder").count(), 2);
        assert!(doc.contains("Ledger design notes"));
        assert!(!doc.contains("Hiring a first engineer"));
        assert!(doc.ends_with("Last active on 2024-05-28"));
    }

    #[test]
    fn test_recent_conversations_window_and_fallback() {
        let p = Profile::from_value(record()).unwrap();
        let recent = p.recent_conversations(day("2024-05-28"), 30);
        assert_eq!(recent.len(), 2);

        let stale = p.recent_conversations(day("2025-01-01"), 30);
        assert_eq!(stale.len(), 3);
        assert_eq!(stale[0].text, "Ledger design notes");
    }
}
