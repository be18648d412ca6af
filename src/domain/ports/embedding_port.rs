use crate::domain::error::EmbeddingError;

/// A text-embedding model.
///
/// Calls are blocking and may be slow; the application layer only invokes
/// them from the worker pool, never from an async task.
pub trait EmbeddingProvider: Send + Sync {
    /// Model identifier recorded in index artifacts.
    fn name(&self) -> &str;

    fn dimension(&self) -> usize;

    /// One-time, expensive initialization. Idempotent.
    fn load(&self) -> Result<(), EmbeddingError>;

    fn is_loaded(&self) -> bool;

    /// Embed one non-empty text. Fails with `ModelNotLoaded` before `load`.
    fn encode(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        texts.iter().map(|t| self.encode(t)).collect()
    }
}

/// Reject vectors of the wrong length before they reach similarity maths.
pub fn check_dimension(vector: Vec<f32>, expected: usize) -> Result<Vec<f32>, EmbeddingError> {
    if vector.len() != expected {
        return Err(EmbeddingError::DimensionMismatch {
            expected,
            actual: vector.len(),
        });
    }
    Ok(vector)
}
