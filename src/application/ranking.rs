use crate::domain::entities::profile::Profile;
use crate::domain::entities::search::ScoredMatch;
use crate::domain::values::activity_status::ActivityStatus;
use crate::domain::values::similarity::by_score_desc;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::error;

/// Weight of the secondary score inside a tied group. With at most
/// 0.3 + 0.5 of secondary score the nudge never exceeds 0.04.
const TIE_BREAK_WEIGHT: f64 = 0.05;
const MAX_COUNTED_CONVERSATIONS: usize = 5;

#[derive(Debug, thiserror::Error)]
enum RankingError {
    #[error("non-finite similarity score for profile {0}")]
    NonFiniteScore(i64),
}

/// Order matches by similarity, breaking near-ties on activity and engagement.
///
/// Scores are grouped by their value rounded to two decimals. Groups keep
/// their descending order; only members of the same group are reordered.
/// Never fails: on bad input it falls back to a plain descending sort.
pub fn rank(matches: Vec<ScoredMatch>, today: NaiveDate) -> Vec<ScoredMatch> {
    match try_rank(&matches, today) {
        Ok(ranked) => ranked,
        Err(e) => {
            error!(error = %e, "ranking failed, falling back to raw score order");
            fallback_sort(matches)
        }
    }
}

fn try_rank(matches: &[ScoredMatch], today: NaiveDate) -> Result<Vec<ScoredMatch>, RankingError> {
    let mut groups: BTreeMap<i64, Vec<ScoredMatch>> = BTreeMap::new();
    for m in matches {
        if !m.score.is_finite() {
            return Err(RankingError::NonFiniteScore(m.profile.id));
        }
        groups.entry(score_bucket(m.score)).or_default().push(m.clone());
    }

    let mut ranked = Vec::with_capacity(matches.len());
    for (_, mut group) in groups.into_iter().rev() {
        if group.len() > 1 {
            group.sort_by(|a, b| {
                let ka = tie_break_key(a, today);
                let kb = tie_break_key(b, today);
                by_score_desc(ka, kb).then(a.profile.id.cmp(&b.profile.id))
            });
        }
        ranked.extend(group);
    }
    Ok(ranked)
}

/// Score rounded to two decimals, as an integer number of hundredths.
pub fn score_bucket(score: f64) -> i64 {
    (score * 100.0).round() as i64
}

pub fn activity_bonus(status: ActivityStatus) -> f64 {
    match status {
        ActivityStatus::Active => 0.3,
        ActivityStatus::Recent => 0.2,
        ActivityStatus::Inactive => 0.1,
    }
}

pub fn conversation_bonus(profile: &Profile) -> f64 {
    0.1 * profile.conversation_count().min(MAX_COUNTED_CONVERSATIONS) as f64
}

pub fn secondary_score(profile: &Profile, today: NaiveDate) -> f64 {
    activity_bonus(profile.activity_status(today)) + conversation_bonus(profile)
}

pub fn tie_break_key(m: &ScoredMatch, today: NaiveDate) -> f64 {
    m.score + secondary_score(&m.profile, today) * TIE_BREAK_WEIGHT
}

/// Plain descending raw-score order; non-finite scores sink to the end.
fn fallback_sort(mut matches: Vec<ScoredMatch>) -> Vec<ScoredMatch> {
    matches.sort_by(|a, b| by_score_desc(a.score, b.score).then(a.profile.id.cmp(&b.profile.id)));
    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::profile::Conversation;
    use serde_json::json;
    use std::sync::Arc;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn profile(id: i64, days_ago: i64, conversations: usize) -> Arc<Profile> {
        let last_active = (today() - chrono::Duration::days(days_ago)).format("%Y-%m-%d").to_string();
        let mut p = Profile::from_value(json!({
            "id": id,
            "name": format!("P{id}"),
            "bio": "bio",
            "location": "Paris",
            "user_status": "active",
            "current_role": "engineer",
            "experience_level": "mid",
            "networking_intent": "hiring",
            "pivot_status": "consistent",
            "domain_expertise": [],
            "skill_levels": {},
            "last_active": last_active
        }))
        .unwrap();
        p.conversations = (0..conversations)
            .map(|i| Conversation { text: format!("c{i}"), timestamp: "2024-05-01".into() })
            .collect();
        Arc::new(p)
    }

    fn ids(ranked: &[ScoredMatch]) -> Vec<i64> {
        ranked.iter().map(|m| m.profile.id).collect()
    }

    #[test]
    fn test_bonus_values() {
        assert_eq!(activity_bonus(ActivityStatus::Active), 0.3);
        assert_eq!(activity_bonus(ActivityStatus::Recent), 0.2);
        assert_eq!(activity_bonus(ActivityStatus::Inactive), 0.1);
        assert!((conversation_bonus(&profile(1, 0, 9)) - 0.5).abs() < 1e-12);
        assert!((conversation_bonus(&profile(1, 0, 2)) - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_tie_break_never_crosses_groups() {
        // Inactive, no conversations, but a higher rounded score.
        let a = ScoredMatch::new(profile(1, 90, 0), 0.81);
        // Maximal bonus, lower rounded score.
        let b = ScoredMatch::new(profile(2, 0, 10), 0.804);
        let ranked = rank(vec![b, a], today());
        assert_eq!(ids(&ranked), vec![1, 2]);
    }

    #[test]
    fn test_active_engaged_wins_within_group() {
        let stale = ScoredMatch::new(profile(1, 45, 0), 0.7249);
        let engaged = ScoredMatch::new(profile(2, 1, 5), 0.7201);
        let ranked = rank(vec![stale, engaged], today());
        assert_eq!(ids(&ranked), vec![2, 1]);
    }

    #[test]
    fn test_recent_beats_inactive_when_scores_equal() {
        let inactive = ScoredMatch::new(profile(1, 30, 1), 0.5);
        let recent = ScoredMatch::new(profile(2, 10, 1), 0.5);
        let ranked = rank(vec![inactive, recent], today());
        assert_eq!(ids(&ranked), vec![2, 1]);
    }

    #[test]
    fn test_identical_keys_order_by_id() {
        let a = ScoredMatch::new(profile(9, 3, 2), 0.6);
        let b = ScoredMatch::new(profile(4, 3, 2), 0.6);
        let ranked = rank(vec![a, b], today());
        assert_eq!(ids(&ranked), vec![4, 9]);
    }

    #[test]
    fn test_singleton_groups_keep_score_order() {
        let ranked = rank(
            vec![
                ScoredMatch::new(profile(1, 0, 0), 0.31),
                ScoredMatch::new(profile(2, 0, 0), 0.92),
                ScoredMatch::new(profile(3, 0, 0), 0.55),
            ],
            today(),
        );
        assert_eq!(ids(&ranked), vec![2, 3, 1]);
    }

    #[test]
    fn test_non_finite_score_falls_back() {
        let ranked = rank(
            vec![
                ScoredMatch::new(profile(1, 0, 0), 0.2),
                ScoredMatch::new(profile(2, 0, 0), f64::NAN),
                ScoredMatch::new(profile(3, 0, 0), 0.9),
            ],
            today(),
        );
        assert_eq!(ids(&ranked), vec![3, 1, 2]);
    }

    #[test]
    fn test_fallback_is_descending_with_many_scores() {
        let ranked = rank(
            vec![
                ScoredMatch::new(profile(1, 0, 0), 0.4),
                ScoredMatch::new(profile(2, 0, 0), f64::NAN),
                ScoredMatch::new(profile(3, 0, 0), 0.7),
                ScoredMatch::new(profile(4, 0, 0), 0.1),
                ScoredMatch::new(profile(5, 0, 0), f64::NAN),
                ScoredMatch::new(profile(6, 0, 0), 0.7),
            ],
            today(),
        );
        assert_eq!(ids(&ranked), vec![3, 6, 1, 4, 2, 5]);
    }

    #[test]
    fn test_empty_input() {
        assert!(rank(Vec::new(), today()).is_empty());
    }
}
