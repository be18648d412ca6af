use crate::domain::entities::index_artifact::IndexArtifact;
use crate::domain::entities::profile::ProfileId;
use crate::domain::error::IndexError;
use crate::domain::ports::vector_index::{IndexHit, VectorIndex};
use crate::domain::values::similarity::{by_score_desc, dot, l2_normalize};
use std::collections::HashSet;

/// Exact inner-product index over unit-normalized rows.
///
/// Rows are stored contiguously; every search is an exhaustive scan, so
/// results are exact and identical to pairwise cosine similarity.
#[derive(Debug, Clone)]
pub struct FlatIndex {
    dimension: usize,
    ids: Vec<ProfileId>,
    data: Vec<f32>,
}

impl FlatIndex {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            ids: Vec::new(),
            data: Vec::new(),
        }
    }

    /// Build from a stored artifact, preserving its row order.
    pub fn from_artifact(artifact: &IndexArtifact) -> Result<Self, IndexError> {
        let mut index = Self::new(artifact.meta.dimension);
        let mut seen = HashSet::with_capacity(artifact.len());
        for row in &artifact.rows {
            if !seen.insert(row.profile_id) {
                return Err(IndexError::Corrupt(format!(
                    "profile {} appears more than once",
                    row.profile_id
                )));
            }
            index.add(row.profile_id, &row.vector)?;
        }
        Ok(index)
    }

    pub fn add(&mut self, profile_id: ProfileId, vector: &[f32]) -> Result<(), IndexError> {
        if vector.len() != self.dimension {
            return Err(IndexError::DimensionMismatch {
                expected: self.dimension,
                actual: vector.len(),
            });
        }
        let mut row = vector.to_vec();
        l2_normalize(&mut row);
        self.ids.push(profile_id);
        self.data.extend_from_slice(&row);
        Ok(())
    }

    pub fn profile_ids(&self) -> &[ProfileId] {
        &self.ids
    }

    fn row(&self, position: usize) -> &[f32] {
        let start = position * self.dimension;
        &self.data[start..start + self.dimension]
    }
}

impl VectorIndex for FlatIndex {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn len(&self) -> usize {
        self.ids.len()
    }

    fn search(&self, query: &[f32], top_k: usize) -> Result<Vec<IndexHit>, IndexError> {
        if query.len() != self.dimension {
            return Err(IndexError::DimensionMismatch {
                expected: self.dimension,
                actual: query.len(),
            });
        }
        let mut normalized = query.to_vec();
        l2_normalize(&mut normalized);

        let mut hits: Vec<IndexHit> = self
            .ids
            .iter()
            .enumerate()
            .map(|(position, &profile_id)| IndexHit {
                position,
                profile_id,
                score: dot(&normalized, self.row(position)),
            })
            .collect();

        hits.sort_by(|a, b| by_score_desc(a.score, b.score).then(a.position.cmp(&b.position)));
        hits.truncate(top_k);
        Ok(hits)
    }
}
