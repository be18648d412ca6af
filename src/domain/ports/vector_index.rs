use crate::domain::entities::profile::ProfileId;
use crate::domain::error::IndexError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexHit {
    pub position: usize,
    pub profile_id: ProfileId,
    pub score: f64,
}

/// Read-only nearest-neighbour index over unit-normalized vectors.
pub trait VectorIndex: Send + Sync {
    fn dimension(&self) -> usize;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Up to `top_k` hits by descending inner product with the normalized query.
    fn search(&self, query: &[f32], top_k: usize) -> Result<Vec<IndexHit>, IndexError>;
}
