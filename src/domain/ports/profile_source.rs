use crate::domain::entities::profile::Profile;
use crate::domain::error::DomainError;

/// The static profile batch read once at startup.
pub trait ProfileSource: Send + Sync {
    fn load(&self) -> Result<Vec<Profile>, DomainError>;
}
