use crate::domain::entities::index_artifact::IndexArtifact;
use crate::domain::error::{DomainError, IndexError};

/// Persistence for the offline-built index artifact.
pub trait IndexStore: Send + Sync {
    fn save(&self, artifact: &IndexArtifact) -> Result<(), DomainError>;

    /// `IndexNotLoaded` when no artifact has been written.
    fn load(&self) -> Result<IndexArtifact, IndexError>;
}
