use crate::application::explanation::ExplanationGenerator;
use crate::application::matching::MatchingEngine;
use crate::application::profile_cache::ProfileCache;
use crate::application::ranking::rank;
use crate::domain::entities::search::{RankedResult, SearchRequest, SearchResponse, SearchStatus};
use crate::domain::error::MatchError;
use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

/// The search pipeline: candidates, matching, ranking, explanation.
///
/// Every outcome, including failures, comes back as a [`SearchResponse`]
/// with a status and guidance text.
pub struct SearchUseCase {
    engine: MatchingEngine,
    cache: Arc<ProfileCache>,
    explainer: ExplanationGenerator,
    ready: bool,
}

impl SearchUseCase {
    pub fn new(
        engine: MatchingEngine,
        cache: Arc<ProfileCache>,
        explainer: ExplanationGenerator,
        ready: bool,
    ) -> Self {
        Self {
            engine,
            cache,
            explainer,
            ready,
        }
    }

    pub async fn execute(&self, request: &SearchRequest) -> SearchResponse {
        self.execute_on(request, chrono::Local::now().date_naive()).await
    }

    /// Same as [`execute`](Self::execute) with activity measured against `today`.
    pub async fn execute_on(&self, request: &SearchRequest, today: NaiveDate) -> SearchResponse {
        let span = info_span!("search", search_id = %Uuid::new_v4(), k = request.k());
        self.run(request, today).instrument(span).await
    }

    async fn run(&self, request: &SearchRequest, today: NaiveDate) -> SearchResponse {
        let started = Instant::now();
        let query = request.query();
        let guidance = |status: SearchStatus| SearchResponse::guidance(query, status, elapsed_ms(started));

        if request.is_blank() {
            info!("empty query");
            return guidance(SearchStatus::EmptyQuery);
        }
        if !self.ready {
            warn!("search requested before services were ready");
            return guidance(SearchStatus::NotReady);
        }
        if self.cache.is_empty() {
            warn!("profile cache is empty");
            return guidance(SearchStatus::NotReady);
        }

        let candidates = self.cache.candidates_excluding(request.exclude_id());
        if candidates.is_empty() {
            info!("no candidates left after exclusion");
            return guidance(SearchStatus::NoCandidates);
        }

        let outcome = match self.engine.find_matches(request, &candidates).await {
            Ok(outcome) => outcome,
            Err(MatchError::NotReady(reason)) => {
                warn!(%reason, "matching engine not ready");
                return guidance(SearchStatus::NotReady);
            }
            Err(MatchError::Internal(reason)) => {
                error!(%reason, "search failed");
                return guidance(SearchStatus::InternalFailure);
            }
        };
        if outcome.matches.is_empty() {
            info!(threshold = request.min_similarity_threshold(), "no candidate passed the threshold");
            return guidance(SearchStatus::NoMatches);
        }

        let mut ranked = rank(outcome.matches, today);
        ranked.truncate(request.k());

        let results: Vec<RankedResult> = ranked
            .into_iter()
            .enumerate()
            .map(|(i, scored)| {
                let explanation = (i == 0).then(|| {
                    self.explainer
                        .explain(&scored.profile, scored.score, &outcome.expanded_query, today)
                });
                let status = scored.profile.activity_status(today);
                let display = scored.profile.activity_display(today);
                RankedResult::new(i + 1, scored, status, display, explanation)
            })
            .collect();

        let response = SearchResponse::success(query, results, elapsed_ms(started));
        info!(
            results = response.total_found,
            used_index = outcome.used_index,
            elapsed_ms = response.search_time_ms,
            "search completed"
        );
        response
    }
}

fn elapsed_ms(started: Instant) -> f64 {
    (started.elapsed().as_secs_f64() * 100_000.0).round() / 100.0
}
