use crate::application::expansion::QueryExpander;
use crate::domain::entities::profile::{Profile, ProfileId};
use crate::domain::entities::search::{ScoredMatch, SearchRequest};
use crate::domain::error::{EmbeddingError, IndexError, MatchError};
use crate::domain::ports::embedding_port::EmbeddingProvider;
use crate::domain::ports::vector_index::VectorIndex;
use crate::domain::values::similarity::{by_score_desc, cosine_similarity};
use crate::infrastructure::worker_pool::WorkerPool;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Per-request pipeline position, logged as the request advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStage {
    Idle,
    QueryValidated,
    QueryExpanded,
    Embedded,
    Searched,
    Filtered,
    Done,
    Failed,
}

impl fmt::Display for MatchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MatchStage::Idle => "idle",
            MatchStage::QueryValidated => "query_validated",
            MatchStage::QueryExpanded => "query_expanded",
            MatchStage::Embedded => "embedded",
            MatchStage::Searched => "searched",
            MatchStage::Filtered => "filtered",
            MatchStage::Done => "done",
            MatchStage::Failed => "failed",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Default)]
pub struct MatchOutcome {
    /// Lowercased query with expansion phrases appended; empty for blank queries.
    pub expanded_query: String,
    /// Scores at or above the threshold, best first, ties by profile id.
    pub matches: Vec<ScoredMatch>,
    pub used_index: bool,
}

/// Scores candidates against a query, through the index when one is loaded.
pub struct MatchingEngine {
    embedder: Arc<dyn EmbeddingProvider>,
    index: Option<Arc<dyn VectorIndex>>,
    pool: Arc<WorkerPool>,
    expander: QueryExpander,
}

struct Progress(MatchStage);

impl Progress {
    fn advance(&mut self, next: MatchStage) {
        debug!(from = %self.0, to = %next, "match stage");
        self.0 = next;
    }
}

impl MatchingEngine {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        index: Option<Arc<dyn VectorIndex>>,
        pool: Arc<WorkerPool>,
        expander: QueryExpander,
    ) -> Self {
        Self {
            embedder,
            index,
            pool,
            expander,
        }
    }

    pub async fn find_matches(
        &self,
        request: &SearchRequest,
        candidates: &[Arc<Profile>],
    ) -> Result<MatchOutcome, MatchError> {
        let mut progress = Progress(MatchStage::Idle);
        match self.run(request, candidates, &mut progress).await {
            Ok(outcome) => {
                progress.advance(MatchStage::Done);
                Ok(outcome)
            }
            Err(e) => {
                warn!(stage = %progress.0, error = %e, "matching failed");
                progress.advance(MatchStage::Failed);
                Err(e)
            }
        }
    }

    async fn run(
        &self,
        request: &SearchRequest,
        candidates: &[Arc<Profile>],
        progress: &mut Progress,
    ) -> Result<MatchOutcome, MatchError> {
        if request.is_blank() {
            return Ok(MatchOutcome::default());
        }
        progress.advance(MatchStage::QueryValidated);

        if !self.embedder.is_loaded() {
            return Err(MatchError::NotReady("embedding model not loaded".to_string()));
        }

        let expanded_query = self.expander.expand(request.query());
        debug!(query = request.query(), expanded = %expanded_query, "query expanded");
        progress.advance(MatchStage::QueryExpanded);

        let embedder = Arc::clone(&self.embedder);
        let text = expanded_query.clone();
        let query_vector = self.pool.run(move || embedder.encode(&text)).await??;
        progress.advance(MatchStage::Embedded);

        let (scored, used_index) = match self.search_index(&query_vector, candidates).await? {
            Some(scored) => (scored, true),
            None => (self.brute_force(query_vector, candidates).await?, false),
        };
        progress.advance(MatchStage::Searched);

        let threshold = request.min_similarity_threshold();
        let total = scored.len();
        let mut matches: Vec<ScoredMatch> = scored.into_iter().filter(|m| m.score >= threshold).collect();
        info!(
            scored = total,
            passed = matches.len(),
            threshold,
            used_index,
            "similarity filter applied"
        );
        progress.advance(MatchStage::Filtered);

        matches.sort_by(|a, b| by_score_desc(a.score, b.score).then(a.profile.id.cmp(&b.profile.id)));

        Ok(MatchOutcome {
            expanded_query,
            matches,
            used_index,
        })
    }

    /// Scores every indexed row, then keeps the rows belonging to eligible
    /// candidates. `Ok(None)` sends the caller to brute-force search.
    async fn search_index(
        &self,
        query_vector: &[f32],
        candidates: &[Arc<Profile>],
    ) -> Result<Option<Vec<ScoredMatch>>, MatchError> {
        let Some(index) = self.index.as_ref().map(Arc::clone) else {
            return Ok(None);
        };
        let query = query_vector.to_vec();
        let hits = match self
            .pool
            .run(move || {
                if index.is_empty() {
                    return Err(IndexError::IndexNotLoaded);
                }
                let k = index.len();
                index.search(&query, k)
            })
            .await?
        {
            Ok(hits) => hits,
            Err(IndexError::IndexNotLoaded) => {
                warn!("vector index unavailable, falling back to brute-force search");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let eligible: HashMap<ProfileId, &Arc<Profile>> =
            candidates.iter().map(|p| (p.id, p)).collect();
        let scored = hits
            .into_iter()
            .filter_map(|hit| {
                eligible
                    .get(&hit.profile_id)
                    .map(|p| ScoredMatch::new(Arc::clone(p), hit.score))
            })
            .collect();
        Ok(Some(scored))
    }

    /// Embeds every candidate on the worker pool and compares it with the
    /// query. Candidate vectors are recomputed on every call.
    async fn brute_force(
        &self,
        query_vector: Vec<f32>,
        candidates: &[Arc<Profile>],
    ) -> Result<Vec<ScoredMatch>, MatchError> {
        if candidates.is_empty() {
            return Ok(Vec::new());
        }
        let query_vector = Arc::new(query_vector);
        let chunk_size = candidates.len().div_ceil(self.pool.size());

        let mut handles = Vec::new();
        for chunk in candidates.chunks(chunk_size) {
            let chunk: Vec<Arc<Profile>> = chunk.to_vec();
            let embedder = Arc::clone(&self.embedder);
            let query_vector = Arc::clone(&query_vector);
            let handle = self
                .pool
                .spawn(move || score_chunk(embedder.as_ref(), &query_vector, chunk))
                .await?;
            handles.push(handle);
        }

        let mut scored = Vec::with_capacity(candidates.len());
        for handle in handles {
            scored.extend(handle.join().await??);
        }
        Ok(scored)
    }
}

fn score_chunk(
    embedder: &dyn EmbeddingProvider,
    query_vector: &[f32],
    chunk: Vec<Arc<Profile>>,
) -> Result<Vec<ScoredMatch>, EmbeddingError> {
    let mut scored = Vec::with_capacity(chunk.len());
    for profile in chunk {
        match embedder.encode(&profile.embedding_text()) {
            Ok(vector) => {
                let score = cosine_similarity(query_vector, &vector);
                scored.push(ScoredMatch::new(profile, score));
            }
            Err(EmbeddingError::ModelNotLoaded) => return Err(EmbeddingError::ModelNotLoaded),
            Err(e) => warn!(profile_id = profile.id, error = %e, "skipping candidate that failed to encode"),
        }
    }
    Ok(scored)
}
