use crate::domain::entities::profile::{Profile, ProfileId};
use crate::domain::error::ValidationError;
use crate::domain::values::activity_status::ActivityStatus;
use crate::domain::values::similarity::as_percentage;
use serde::Serialize;
use std::sync::Arc;

pub const MIN_RESULTS: usize = 1;
pub const MAX_RESULTS: usize = 20;
pub const DEFAULT_RESULTS: usize = 5;
pub const DEFAULT_THRESHOLD: f64 = 0.1;

/// A validated search. Only constructible through [`SearchRequest::new`],
/// so `k` and `min_similarity_threshold` are always in range downstream.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchRequest {
    query: String,
    k: usize,
    exclude_id: Option<ProfileId>,
    min_similarity_threshold: f64,
}

impl SearchRequest {
    pub fn new(
        query: &str,
        k: usize,
        exclude_id: Option<ProfileId>,
        min_similarity_threshold: f64,
    ) -> Result<Self, ValidationError> {
        if !(MIN_RESULTS..=MAX_RESULTS).contains(&k) {
            return Err(ValidationError::ResultCount {
                min: MIN_RESULTS,
                max: MAX_RESULTS,
                value: k,
            });
        }
        if !(0.0..=1.0).contains(&min_similarity_threshold) {
            return Err(ValidationError::Threshold(min_similarity_threshold));
        }
        Ok(Self {
            query: query.split_whitespace().collect::<Vec<_>>().join(" "),
            k,
            exclude_id,
            min_similarity_threshold,
        })
    }

    /// Whitespace-collapsed query text; empty for blank input.
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn exclude_id(&self) -> Option<ProfileId> {
        self.exclude_id
    }

    pub fn min_similarity_threshold(&self) -> f64 {
        self.min_similarity_threshold
    }

    pub fn is_blank(&self) -> bool {
        self.query.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct ScoredMatch {
    pub profile: Arc<Profile>,
    pub score: f64,
}

impl ScoredMatch {
    pub fn new(profile: Arc<Profile>, score: f64) -> Self {
        Self { profile, score }
    }
}

/// One row of a search response.
#[derive(Debug, Clone, Serialize)]
pub struct RankedResult {
    /// 1-based
    pub rank: usize,
    pub similarity_score: f64,
    pub similarity_percentage: f64,
    pub activity_status: ActivityStatus,
    pub activity_display: String,
    pub conversation_count: usize,
    /// Only set on rank 1
    pub explanation: Option<String>,
    pub profile: Arc<Profile>,
}

impl RankedResult {
    pub fn new(
        rank: usize,
        scored: ScoredMatch,
        activity_status: ActivityStatus,
        activity_display: String,
        explanation: Option<String>,
    ) -> Self {
        Self {
            rank,
            similarity_score: scored.score,
            similarity_percentage: as_percentage(scored.score),
            activity_status,
            activity_display,
            conversation_count: scored.profile.conversation_count(),
            explanation,
            profile: scored.profile,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStatus {
    Success,
    EmptyQuery,
    NoCandidates,
    NoMatches,
    NotReady,
    InternalFailure,
}

/// Structured response returned for every search, including failures.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<RankedResult>,
    pub total_found: usize,
    pub search_time_ms: f64,
    pub top_match_explanation: Option<String>,
    pub status: SearchStatus,
    pub error_message: Option<String>,
    pub suggestions: Vec<String>,
}

impl SearchResponse {
    pub fn success(query: &str, results: Vec<RankedResult>, search_time_ms: f64) -> Self {
        let top_match_explanation = results.first().and_then(|r| r.explanation.clone());
        Self {
            query: query.to_string(),
            total_found: results.len(),
            results,
            search_time_ms,
            top_match_explanation,
            status: SearchStatus::Success,
            error_message: None,
            suggestions: Vec::new(),
        }
    }

    /// An empty response carrying the guidance text for `status`.
    pub fn guidance(query: &str, status: SearchStatus, search_time_ms: f64) -> Self {
        let (message, suggestions): (&str, &[&str]) = match status {
            SearchStatus::Success => ("", &[]),
            SearchStatus::EmptyQuery => (
                "Please enter a search query",
                &[
                    "Try: 'AI developer'",
                    "Try: 'fintech expert'",
                    "Try: 'need a co-founder'",
                ],
            ),
            SearchStatus::NoCandidates => (
                "No users available for matching",
                &["Please try again later when more users are available"],
            ),
            SearchStatus::NoMatches => (
                "No matches found",
                &[
                    "Try using different keywords",
                    "Make your query more specific",
                    "Consider alternative terms for your requirements",
                ],
            ),
            SearchStatus::NotReady => (
                "Search services are not ready. Please try again later.",
                &[],
            ),
            SearchStatus::InternalFailure => (
                "Internal search error occurred",
                &["Please try again with a different query"],
            ),
        };
        Self {
            query: query.to_string(),
            results: Vec::new(),
            total_found: 0,
            search_time_ms,
            top_match_explanation: None,
            status,
            error_message: (!message.is_empty()).then(|| message.to_string()),
            suggestions: suggestions.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == SearchStatus::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_bounds() {
        assert!(SearchRequest::new("ai", 1, None, 0.0).is_ok());
        assert!(SearchRequest::new("ai", 20, None, 1.0).is_ok());
        assert_eq!(
            SearchRequest::new("ai", 0, None, 0.1).unwrap_err(),
            ValidationError::ResultCount { min: 1, max: 20, value: 0 }
        );
        assert!(SearchRequest::new("ai", 21, None, 0.1).is_err());
        assert_eq!(
            SearchRequest::new("ai", 5, None, 1.5).unwrap_err(),
            ValidationError::Threshold(1.5)
        );
        assert!(SearchRequest::new("ai", 5, None, f64::NAN).is_err());
    }

    #[test]
    fn test_query_is_collapsed() {
        let req = SearchRequest::new("  rust   developer \n", 5, None, 0.1).unwrap();
        assert_eq!(req.query(), "rust developer");
        assert!(SearchRequest::new("   ", 5, None, 0.1).unwrap().is_blank());
    }

    #[test]
    fn test_guidance_carries_suggestions() {
        let resp = SearchResponse::guidance("", SearchStatus::EmptyQuery, 0.2);
        assert_eq!(resp.error_message.as_deref(), Some("Please enter a search query"));
        assert_eq!(resp.suggestions.len(), 3);
        assert!(resp.results.is_empty());

        let resp = SearchResponse::guidance("x", SearchStatus::NotReady, 0.0);
        assert!(resp.suggestions.is_empty());
        assert!(!resp.is_success());
    }
}
