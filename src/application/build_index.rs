use crate::application::profile_cache::ProfileCache;
use crate::domain::entities::index_artifact::{IndexArtifact, IndexMeta, IndexRow};
use crate::domain::entities::profile::Profile;
use crate::domain::error::DomainError;
use crate::domain::ports::embedding_port::EmbeddingProvider;
use crate::domain::ports::index_store::IndexStore;
use crate::domain::ports::profile_source::ProfileSource;
use crate::domain::values::document_mode::DocumentMode;
use crate::infrastructure::worker_pool::WorkerPool;
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Texts per embedding job.
const BATCH_SIZE: usize = 32;

#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
    #[serde(flatten)]
    pub meta: IndexMeta,
    pub profile_count: usize,
}

/// Offline construction of the index artifact from the profile batch.
pub struct BuildIndexUseCase {
    source: Arc<dyn ProfileSource>,
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn IndexStore>,
    pool: Arc<WorkerPool>,
}

impl BuildIndexUseCase {
    pub fn new(
        source: Arc<dyn ProfileSource>,
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn IndexStore>,
        pool: Arc<WorkerPool>,
    ) -> Self {
        Self {
            source,
            embedder,
            store,
            pool,
        }
    }

    pub async fn execute(&self, mode: DocumentMode) -> Result<BuildReport, DomainError> {
        let profiles = self.source.load()?;
        // Same dedup and ordering rules as the serving cache.
        let profiles = ProfileCache::from_profiles(profiles).all();

        let embedder = Arc::clone(&self.embedder);
        self.pool.run(move || embedder.load()).await??;

        let mut handles = Vec::new();
        for chunk in profiles.chunks(BATCH_SIZE) {
            let texts: Vec<String> = chunk.iter().map(|p| document_text(p, mode)).collect();
            let embedder = Arc::clone(&self.embedder);
            handles.push(self.pool.spawn(move || embedder.encode_batch(&texts)).await?);
        }

        let mut rows = Vec::with_capacity(profiles.len());
        for (handle, chunk) in handles.into_iter().zip(profiles.chunks(BATCH_SIZE)) {
            let vectors = handle.join().await??;
            if vectors.len() != chunk.len() {
                return Err(DomainError::Embedding(format!(
                    "expected {} vectors, provider returned {}",
                    chunk.len(),
                    vectors.len()
                )));
            }
            rows.extend(chunk.iter().zip(vectors).map(|(p, vector)| IndexRow {
                profile_id: p.id,
                vector,
            }));
        }

        let artifact = IndexArtifact {
            meta: IndexMeta {
                dimension: self.embedder.dimension(),
                model: self.embedder.name().to_string(),
                document_mode: mode,
                built_at: Utc::now(),
            },
            rows,
        };

        let store = Arc::clone(&self.store);
        let meta = artifact.meta.clone();
        let profile_count = artifact.len();
        self.pool.run(move || store.save(&artifact)).await??;

        info!(
            profiles = profile_count,
            model = %meta.model,
            mode = %meta.document_mode,
            "index artifact written"
        );
        Ok(BuildReport { meta, profile_count })
    }
}

pub fn document_text(profile: &Profile, mode: DocumentMode) -> String {
    match mode {
        DocumentMode::Plain => profile.embedding_text(),
        DocumentMode::Enriched => profile.enriched_document(),
    }
}
