use crate::domain::entities::profile::Profile;
use crate::domain::error::DomainError;
use crate::domain::ports::profile_source::ProfileSource;
use std::path::PathBuf;
use tracing::{info, warn};

/// Profile batch stored as a JSON array of records.
pub struct JsonProfileSource {
    path: PathBuf,
}

impl JsonProfileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ProfileSource for JsonProfileSource {
    fn load(&self) -> Result<Vec<Profile>, DomainError> {
        let raw = std::fs::read_to_string(&self.path).map_err(|e| {
            DomainError::Io(format!("cannot read {}: {e}", self.path.display()))
        })?;
        let profiles = parse_profiles(&raw)?;
        info!(path = %self.path.display(), count = profiles.len(), "loaded profile batch");
        Ok(profiles)
    }
}

/// Parse a JSON array of profile records. Invalid records are skipped with a
/// warning; a batch with no valid record is an error.
pub fn parse_profiles(raw: &str) -> Result<Vec<Profile>, DomainError> {
    let value: serde_json::Value =
        serde_json::from_str(raw).map_err(|e| DomainError::Parse(format!("Invalid JSON: {e}")))?;
    let serde_json::Value::Array(records) = value else {
        return Err(DomainError::Parse("profile data must be a JSON array".into()));
    };

    let total = records.len();
    let mut profiles = Vec::with_capacity(total);
    for (i, record) in records.into_iter().enumerate() {
        match Profile::from_value(record) {
            Ok(p) => profiles.push(p),
            Err(e) => warn!(record = i + 1, error = %e, "skipping invalid profile record"),
        }
    }

    if profiles.is_empty() {
        return Err(DomainError::InvalidInput(format!(
            "No users could be loaded ({total} records, none valid)"
        )));
    }
    Ok(profiles)
}
