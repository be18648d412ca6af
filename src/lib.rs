pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

use crate::application::build_index::{BuildIndexUseCase, BuildReport};
use crate::application::expansion::QueryExpander;
use crate::application::explanation::ExplanationGenerator;
use crate::application::health::{HealthReport, ServiceStatus, UserDirectory};
use crate::application::keywords::KeywordTables;
use crate::application::matching::MatchingEngine;
use crate::application::profile_cache::ProfileCache;
use crate::application::search::SearchUseCase;
use crate::config::MatcherConfig;
use crate::domain::entities::index_artifact::IndexArtifact;
use crate::domain::entities::profile::{Profile, ProfileId};
use crate::domain::entities::search::{SearchRequest, SearchResponse};
use crate::domain::error::{DomainError, IndexError, ValidationError};
use crate::domain::ports::embedding_port::EmbeddingProvider;
use crate::domain::ports::index_store::IndexStore;
use crate::domain::ports::profile_source::ProfileSource;
use crate::domain::ports::vector_index::VectorIndex;
use crate::domain::values::document_mode::DocumentMode;
use crate::domain::values::match_strictness::MatchStrictness;
use crate::infrastructure::embeddings::noop::NoopProvider;
use crate::infrastructure::index::flat::FlatIndex;
use crate::infrastructure::profiles::json_source::JsonProfileSource;
use crate::infrastructure::sqlite::index_store::SqliteIndexStore;
use crate::infrastructure::worker_pool::WorkerPool;
use chrono::NaiveDate;
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::{error, info, warn};

/// Query used to prove the model works before traffic is accepted.
const PROBE_QUERY: &str = "test query";

/// Everything a matcher is assembled from. Tests build this directly;
/// [`ProfileMatcher::start`] fills it from configuration.
pub struct MatcherParts {
    pub embedder: Arc<dyn EmbeddingProvider>,
    pub profiles: Vec<Profile>,
    pub index: Option<IndexArtifact>,
    pub tables: KeywordTables,
    pub strictness: MatchStrictness,
    pub pool: Arc<WorkerPool>,
    /// Failure recorded before assembly (for example an unreadable profile file).
    pub startup_error: Option<String>,
}

impl MatcherParts {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, profiles: Vec<Profile>, pool: Arc<WorkerPool>) -> Self {
        Self {
            embedder,
            profiles,
            index: None,
            tables: KeywordTables::default(),
            strictness: MatchStrictness::default(),
            pool,
            startup_error: None,
        }
    }
}

/// The matching service: profile cache, model, optional index and the
/// search pipeline over them. Read-only once started.
pub struct ProfileMatcher {
    search_uc: SearchUseCase,
    cache: Arc<ProfileCache>,
    status: ServiceStatus,
}

impl ProfileMatcher {
    /// Load profiles, model and index as configured. Component failures
    /// leave the matcher degraded rather than failing startup; only bad
    /// configuration is an error.
    pub async fn start(config: &MatcherConfig) -> Result<Self, DomainError> {
        info!(backend = %config.backend, workers = config.workers, "starting profile matcher");
        let tables = config.keyword_tables()?;
        let pool = Arc::new(WorkerPool::new(config.workers));
        let mut startup_error = None;

        let embedder = match config.build_embedder(Handle::current()) {
            Ok(embedder) => embedder,
            Err(e) => {
                error!(error = %e, "embedding provider unavailable");
                startup_error = Some(e.to_string());
                Arc::new(NoopProvider) as Arc<dyn EmbeddingProvider>
            }
        };

        let source = JsonProfileSource::new(config.profiles_path.clone());
        let profiles = match pool.run(move || source.load()).await? {
            Ok(profiles) => profiles,
            Err(e) => {
                error!(error = %e, "user cache loading failed");
                startup_error = Some(e.to_string());
                Vec::new()
            }
        };

        let index_path = config.index_path.clone();
        let index = match pool
            .run(move || SqliteIndexStore::open_read_only(&index_path)?.load())
            .await?
        {
            Ok(artifact) => Some(artifact),
            Err(IndexError::IndexNotLoaded) => {
                info!(path = %config.index_path.display(), "no index artifact, using brute-force search");
                None
            }
            Err(e) => {
                warn!(error = %e, "index artifact unreadable, using brute-force search");
                startup_error = Some(e.to_string());
                None
            }
        };

        Ok(Self::from_parts(MatcherParts {
            embedder,
            profiles,
            index,
            tables,
            strictness: config.strictness,
            pool,
            startup_error,
        })
        .await)
    }

    /// Load the model on the pool, probe it, validate the index against the
    /// cache and wire the search pipeline.
    pub async fn from_parts(parts: MatcherParts) -> Self {
        let MatcherParts {
            embedder,
            profiles,
            index,
            tables,
            strictness,
            pool,
            startup_error,
        } = parts;
        let mut status = ServiceStatus {
            last_error: startup_error,
            ..ServiceStatus::default()
        };

        let cache = Arc::new(ProfileCache::from_profiles(profiles));
        status.cache_loaded = !cache.is_empty();

        match load_and_probe(&pool, &embedder).await {
            Ok(()) => {
                info!(model = embedder.name(), "embedding model ready");
                status.embedding_model = true;
            }
            Err(e) => {
                error!(error = %e, "service initialization failed");
                status.last_error = Some(e.to_string());
            }
        }

        let index: Option<Arc<dyn VectorIndex>> = match index {
            Some(artifact) => match validate_index(&artifact, embedder.as_ref(), &cache) {
                Ok(flat) => {
                    info!(rows = flat.profile_ids().len(), model = %artifact.meta.model, "vector index loaded");
                    status.vector_index = true;
                    Some(Arc::new(flat))
                }
                Err(e) => {
                    warn!(error = %e, "index rejected, using brute-force search");
                    status.last_error = Some(e.to_string());
                    None
                }
            },
            None => None,
        };

        let tables = Arc::new(tables);
        let engine = MatchingEngine::new(
            embedder,
            index,
            pool,
            QueryExpander::new(Arc::clone(&tables), strictness),
        );
        let search_uc = SearchUseCase::new(
            engine,
            Arc::clone(&cache),
            ExplanationGenerator::new(tables, strictness),
            status.services_ready(),
        );

        if status.services_ready() {
            info!(users = cache.len(), "application startup complete");
        } else {
            warn!("starting in degraded mode: searches will report not ready");
        }
        Self {
            search_uc,
            cache,
            status,
        }
    }

    /// Validate the request, then search. Only out-of-range `k` or
    /// `threshold` is an error; every other outcome is a response status.
    pub async fn search(
        &self,
        query: &str,
        k: usize,
        exclude_id: Option<ProfileId>,
        threshold: f64,
    ) -> Result<SearchResponse, ValidationError> {
        let request = SearchRequest::new(query, k, exclude_id, threshold)?;
        Ok(self.search_request(&request).await)
    }

    pub async fn search_request(&self, request: &SearchRequest) -> SearchResponse {
        self.search_uc.execute(request).await
    }

    /// Search with activity measured against a fixed date.
    pub async fn search_on(&self, request: &SearchRequest, today: NaiveDate) -> SearchResponse {
        self.search_uc.execute_on(request, today).await
    }

    pub fn health(&self) -> HealthReport {
        HealthReport::new(&self.status, &self.cache)
    }

    pub fn users(&self) -> UserDirectory {
        UserDirectory::new(&self.cache, chrono::Local::now().date_naive())
    }

    pub fn status(&self) -> &ServiceStatus {
        &self.status
    }

    pub fn is_ready(&self) -> bool {
        self.status.services_ready()
    }

    /// Build the index artifact at `config.index_path` from `config.profiles_path`.
    pub async fn build_index(config: &MatcherConfig, mode: DocumentMode) -> Result<BuildReport, DomainError> {
        let pool = Arc::new(WorkerPool::new(config.workers));
        let embedder = config.build_embedder(Handle::current())?;
        let source: Arc<dyn ProfileSource> = Arc::new(JsonProfileSource::new(config.profiles_path.clone()));
        let store: Arc<dyn IndexStore> = Arc::new(SqliteIndexStore::create(&config.index_path)?);
        BuildIndexUseCase::new(source, embedder, store, pool).execute(mode).await
    }
}

async fn load_and_probe(pool: &WorkerPool, embedder: &Arc<dyn EmbeddingProvider>) -> Result<(), DomainError> {
    let embedder = Arc::clone(embedder);
    pool.run(move || {
        embedder.load()?;
        embedder.encode(PROBE_QUERY).map(|_| ())
    })
    .await??;
    Ok(())
}

/// An index is only usable when it was built by the serving model and
/// covers exactly the cached profiles.
fn validate_index(
    artifact: &IndexArtifact,
    embedder: &dyn EmbeddingProvider,
    cache: &ProfileCache,
) -> Result<FlatIndex, IndexError> {
    if artifact.meta.model != embedder.name() {
        return Err(IndexError::Corrupt(format!(
            "index was built with model '{}', serving model is '{}'",
            artifact.meta.model,
            embedder.name()
        )));
    }
    let dimension = embedder.dimension();
    if artifact.meta.dimension != dimension {
        return Err(IndexError::DimensionMismatch {
            expected: dimension,
            actual: artifact.meta.dimension,
        });
    }
    if let Some(missing) = artifact.profile_ids().find(|id| !cache.contains(*id)) {
        return Err(IndexError::Corrupt(format!(
            "profile {missing} is indexed but not in the profile cache"
        )));
    }
    if artifact.len() != cache.len() {
        return Err(IndexError::Corrupt(format!(
            "index covers {} profiles, cache holds {}",
            artifact.len(),
            cache.len()
        )));
    }
    FlatIndex::from_artifact(artifact)
}
