use crate::application::keywords::KeywordTables;
use crate::domain::entities::profile::Profile;
use crate::domain::values::activity_status::ActivityStatus;
use crate::domain::values::current_role::CurrentRole;
use crate::domain::values::match_strictness::MatchStrictness;
use crate::domain::values::networking_intent::NetworkingIntent;
use crate::domain::values::similarity::as_percentage;
use crate::domain::values::skill_level::SkillLevel;
use chrono::NaiveDate;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::warn;

const MAX_DOMAIN_MATCHES: usize = 3;
const MAX_SKILL_MATCHES: usize = 3;

const SEEKING_OPPORTUNITIES: &str =
    "actively seeking new opportunities, perfectly aligning with what you're seeking";
const SEEKING_COFOUNDING: &str =
    "actively seeking co-founding opportunities, perfectly aligning with what you're seeking";
const INVESTING: &str = "actively investing in startups, perfectly aligning with what you're seeking";

/// Writes the one-paragraph rationale shown for the top-ranked match.
#[derive(Debug, Clone)]
pub struct ExplanationGenerator {
    tables: Arc<KeywordTables>,
    strictness: MatchStrictness,
}

impl ExplanationGenerator {
    pub fn new(tables: Arc<KeywordTables>, strictness: MatchStrictness) -> Self {
        Self { tables, strictness }
    }

    /// `query` is the expanded query text the match was scored against.
    pub fn explain(&self, profile: &Profile, score: f64, query: &str, today: NaiveDate) -> String {
        if !score.is_finite() {
            warn!(profile_id = profile.id, "cannot explain a non-finite score");
            return fallback(profile, score);
        }
        let query = query.to_lowercase();
        let words: HashSet<&str> = query.split_whitespace().collect();

        let mut reasons = Vec::new();
        let domains = self.domain_matches(&words, &profile.domain_expertise);
        if !domains.is_empty() {
            reasons.push(format!("deep expertise in {}", domains.join(", ")));
        }
        let skills = self.skill_matches(&query, profile);
        if !skills.is_empty() {
            reasons.push(format!(
                "the specific skills you're looking for: {}",
                skills.join(", ")
            ));
        }
        if let Some(intent) = self.intent_match(&query, profile) {
            reasons.push(intent.to_string());
        }

        compose(profile, as_percentage(score), &reasons, today)
    }

    pub fn domain_matches(&self, words: &HashSet<&str>, tags: &[String]) -> Vec<String> {
        let tags: Vec<String> = tags.iter().map(|t| t.to_lowercase()).collect();
        self.tables
            .domains
            .iter()
            .filter(|d| d.keywords.iter().any(|k| words.contains(k.as_str())))
            .filter(|d| {
                tags.iter()
                    .any(|t| t.contains(d.domain.as_str()) || d.domain.contains(t.as_str()))
            })
            .take(MAX_DOMAIN_MATCHES)
            .map(|d| d.domain.clone())
            .collect()
    }

    pub fn skill_matches(&self, query: &str, profile: &Profile) -> Vec<String> {
        profile
            .skill_levels
            .iter()
            .filter(|(skill, _)| self.strictness.contains(query, &skill.to_lowercase()))
            .take(MAX_SKILL_MATCHES)
            .map(|(skill, level)| match level {
                SkillLevel::Expert => format!("{skill} (expert)"),
                SkillLevel::Intermediate => format!("{skill} (intermediate)"),
                SkillLevel::Novice => skill.clone(),
            })
            .collect()
    }

    /// First rule wins: hiring, then cofounder, then funding.
    pub fn intent_match(&self, query: &str, profile: &Profile) -> Option<&'static str> {
        let mentions = |keywords: &[String]| keywords.iter().any(|k| self.strictness.contains(query, k));
        let intents = &self.tables.intents;

        if mentions(&intents.hiring)
            && matches!(
                profile.networking_intent,
                NetworkingIntent::ActivelyLooking | NetworkingIntent::OpenToOpportunities
            )
        {
            return Some(SEEKING_OPPORTUNITIES);
        }
        if mentions(&intents.cofounder) && profile.networking_intent == NetworkingIntent::SeekingCofounder {
            return Some(SEEKING_COFOUNDING);
        }
        if mentions(&intents.funding) && profile.current_role == CurrentRole::Investor {
            return Some(INVESTING);
        }
        None
    }
}

fn intro(name: &str, pct: f64) -> String {
    if pct >= 60.0 {
        format!("{name} is an excellent {pct:.1}% match")
    } else if pct >= 40.0 {
        format!("{name} shows a strong {pct:.1}% match")
    } else if pct >= 25.0 {
        format!("{name} achieved a {pct:.1}% match")
    } else {
        format!("{name} represents a {pct:.1}% semantic match")
    }
}

/// The primary clause carries the first reason. Further reasons trail the
/// "directly matching" note so every matched domain and skill is named.
fn compose(profile: &Profile, pct: f64, reasons: &[String], today: NaiveDate) -> String {
    let intro = intro(&profile.name, pct);
    let mut explanation = match reasons {
        [] => format!("{intro} based on comprehensive profile analysis."),
        [only] => format!("{intro} with {only}."),
        [primary, rest @ ..] => format!(
            "{intro} through {primary}, directly matching your search requirements with {}.",
            rest.join(" and ")
        ),
    };
    if profile.activity_status(today) == ActivityStatus::Active {
        explanation.push_str(" They're currently active on the platform.");
    } else {
        explanation.push_str(" They have relevant experience that aligns with your search.");
    }
    explanation
}

fn fallback(profile: &Profile, score: f64) -> String {
    let pct = as_percentage(score);
    format!("{} is a {pct:.1}% match based on profile analysis.", profile.name)
}
