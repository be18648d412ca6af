use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Index error: {0}")]
    Index(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<std::io::Error> for DomainError {
    fn from(e: std::io::Error) -> Self {
        DomainError::Io(e.to_string())
    }
}

impl From<ValidationError> for DomainError {
    fn from(e: ValidationError) -> Self {
        DomainError::InvalidInput(e.to_string())
    }
}

impl From<EmbeddingError> for DomainError {
    fn from(e: EmbeddingError) -> Self {
        DomainError::Embedding(e.to_string())
    }
}

impl From<IndexError> for DomainError {
    fn from(e: IndexError) -> Self {
        DomainError::Index(e.to_string())
    }
}

impl From<PoolError> for DomainError {
    fn from(e: PoolError) -> Self {
        DomainError::Embedding(e.to_string())
    }
}

/// Rejected input: unknown enum values, out-of-range request bounds, malformed records.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Unknown {field}: '{value}'")]
    UnknownVariant { field: &'static str, value: String },

    #[error("k must be between {min} and {max}, got {value}")]
    ResultCount { min: usize, max: usize, value: usize },

    #[error("Similarity threshold must be between 0.0 and 1.0, got {0}")]
    Threshold(f64),

    #[error("Invalid profile record: {0}")]
    Profile(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EmbeddingError {
    #[error("Embedding model not loaded")]
    ModelNotLoaded,

    #[error("Encoding failed: {0}")]
    EncodingFailure(String),

    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum IndexError {
    #[error("Vector index not loaded")]
    IndexNotLoaded,

    #[error("Index dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Corrupt index artifact: {0}")]
    Corrupt(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PoolError {
    #[error("Worker pool is closed")]
    Closed,

    #[error("Worker panicked while running a job")]
    WorkerPanicked,
}

/// Failures that reach the matching engine boundary.
///
/// `NotReady` is kept apart from everything else so callers can tell
/// "service still starting" from "search went wrong".
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatchError {
    #[error("Matching service not ready: {0}")]
    NotReady(String),

    #[error("Matching failed: {0}")]
    Internal(String),
}

impl From<EmbeddingError> for MatchError {
    fn from(e: EmbeddingError) -> Self {
        match e {
            EmbeddingError::ModelNotLoaded => MatchError::NotReady(e.to_string()),
            other => MatchError::Internal(other.to_string()),
        }
    }
}

impl From<IndexError> for MatchError {
    fn from(e: IndexError) -> Self {
        MatchError::Internal(e.to_string())
    }
}

impl From<PoolError> for MatchError {
    fn from(e: PoolError) -> Self {
        MatchError::Internal(e.to_string())
    }
}
