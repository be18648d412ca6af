use crate::domain::error::EmbeddingError;
use crate::domain::ports::embedding_port::EmbeddingProvider;
use crate::domain::values::similarity::EMBEDDING_DIMENSION;

/// Stand-in used when no model could be configured. It never loads, so the
/// service stays in its "not ready" state instead of returning bogus matches.
pub struct NoopProvider;

impl EmbeddingProvider for NoopProvider {
    fn name(&self) -> &str {
        "noop"
    }

    fn dimension(&self) -> usize {
        EMBEDDING_DIMENSION
    }

    fn load(&self) -> Result<(), EmbeddingError> {
        Err(EmbeddingError::ModelNotLoaded)
    }

    fn is_loaded(&self) -> bool {
        false
    }

    fn encode(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Err(EmbeddingError::ModelNotLoaded)
    }
}
