use crate::domain::error::EmbeddingError;
use crate::domain::ports::embedding_port::EmbeddingProvider;
use crate::domain::values::similarity::{l2_normalize, EMBEDDING_DIMENSION};
use std::sync::atomic::{AtomicBool, Ordering};
use xxhash_rust::xxh3::xxh3_64_with_seed;

const BUCKET_SEED: u64 = 0;
const SIGN_SEED: u64 = 1;

/// Deterministic feature-hashing embedder.
///
/// Each lowercase alphanumeric token is hashed to a bucket and a sign, and the
/// result is L2-normalized. No model files, no network: used offline and in
/// tests. XXH3 has a fixed output specification, so vectors persisted in an
/// index stay valid across builds and toolchains.
pub struct HashingProvider {
    dimension: usize,
    loaded: AtomicBool,
}

impl HashingProvider {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
            loaded: AtomicBool::new(false),
        }
    }

    fn hash(token: &str, seed: u64) -> u64 {
        xxh3_64_with_seed(token.as_bytes(), seed)
    }

    fn embed_tokens(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0_f32; self.dimension];
        let lower = text.to_lowercase();
        for token in lower.split(|c: char| !c.is_alphanumeric()).filter(|t| !t.is_empty()) {
            let idx = (Self::hash(token, BUCKET_SEED) % self.dimension as u64) as usize;
            let sign = if Self::hash(token, SIGN_SEED) % 2 == 0 { 1.0 } else { -1.0 };
            vector[idx] += sign;
        }
        l2_normalize(&mut vector);
        vector
    }
}

impl Default for HashingProvider {
    fn default() -> Self {
        Self::new(EMBEDDING_DIMENSION)
    }
}

impl EmbeddingProvider for HashingProvider {
    fn name(&self) -> &str {
        "feature-hashing-xxh3"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn load(&self) -> Result<(), EmbeddingError> {
        self.loaded.store(true, Ordering::Release);
        Ok(())
    }

    fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::Acquire)
    }

    fn encode(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if !self.is_loaded() {
            return Err(EmbeddingError::ModelNotLoaded);
        }
        Ok(self.embed_tokens(text))
    }
}
