use crate::domain::entities::profile::ProfileId;
use crate::domain::values::document_mode::DocumentMode;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexMeta {
    pub dimension: usize,
    pub model: String,
    pub document_mode: DocumentMode,
    pub built_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexRow {
    pub profile_id: ProfileId,
    pub vector: Vec<f32>,
}

/// Offline-built vectors for the profile batch. Row `i` belongs to the
/// `i`-th profile of the load order used at build time, and also records
/// that profile's id so lookups never depend on position alone.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexArtifact {
    pub meta: IndexMeta,
    pub rows: Vec<IndexRow>,
}

impl IndexArtifact {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn profile_ids(&self) -> impl Iterator<Item = ProfileId> + '_ {
        self.rows.iter().map(|r| r.profile_id)
    }
}
