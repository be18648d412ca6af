use crate::domain::error::EmbeddingError;
use crate::domain::ports::embedding_port::{check_dimension, EmbeddingProvider};
use crate::domain::values::similarity::EMBEDDING_DIMENSION;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use tracing::info;

/// Local all-MiniLM-L6-v2 sentence embedder (384 dimensions).
///
/// The ONNX model is fetched and initialized by `load`, which is slow on first
/// run; until then every `encode` fails with `ModelNotLoaded`.
pub struct FastEmbedProvider {
    cache_dir: Option<PathBuf>,
    model: OnceLock<Mutex<TextEmbedding>>,
}

impl FastEmbedProvider {
    pub fn new(cache_dir: Option<PathBuf>) -> Self {
        Self {
            cache_dir,
            model: OnceLock::new(),
        }
    }
}

impl EmbeddingProvider for FastEmbedProvider {
    fn name(&self) -> &str {
        "all-MiniLM-L6-v2"
    }

    fn dimension(&self) -> usize {
        EMBEDDING_DIMENSION
    }

    fn load(&self) -> Result<(), EmbeddingError> {
        if self.model.get().is_some() {
            return Ok(());
        }
        let mut options =
            InitOptions::new(EmbeddingModel::AllMiniLML6V2).with_show_download_progress(false);
        if let Some(dir) = &self.cache_dir {
            options = options.with_cache_dir(dir.clone());
        }
        let model = TextEmbedding::try_new(options).map_err(|e| {
            EmbeddingError::EncodingFailure(format!("Failed to initialize embedding model: {e}"))
        })?;
        // A concurrent load may have won the race; either model is equivalent.
        let _ = self.model.set(Mutex::new(model));
        info!(model = self.name(), "embedding model loaded");
        Ok(())
    }

    fn is_loaded(&self) -> bool {
        self.model.get().is_some()
    }

    fn encode(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut vectors = self.encode_batch(&[text.to_string()])?;
        vectors
            .pop()
            .ok_or_else(|| EmbeddingError::EncodingFailure("model returned no embedding".into()))
    }

    fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let model = self.model.get().ok_or(EmbeddingError::ModelNotLoaded)?;
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let embeddings = model
            .lock()
            .map_err(|_| EmbeddingError::EncodingFailure("embedding model lock poisoned".into()))?
            .embed(texts.to_vec(), None)
            .map_err(|e| EmbeddingError::EncodingFailure(format!("Failed to generate embeddings: {e}")))?;
        embeddings
            .into_iter()
            .map(|v| check_dimension(v, EMBEDDING_DIMENSION))
            .collect()
    }
}
