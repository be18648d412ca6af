use crate::application::keywords::KeywordTables;
use crate::domain::error::{DomainError, ValidationError};
use crate::domain::ports::embedding_port::EmbeddingProvider;
use crate::domain::values::match_strictness::MatchStrictness;
use crate::domain::values::similarity::EMBEDDING_DIMENSION;
use crate::infrastructure::embeddings::hashing::HashingProvider;
use crate::infrastructure::embeddings::noop::NoopProvider;
use crate::infrastructure::embeddings::remote::RemoteProvider;
use crate::infrastructure::worker_pool::DEFAULT_WORKERS;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use tokio::runtime::Handle;

const ENV_PREFIX: &str = "PROFILEMATCH_";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingBackend {
    FastEmbed,
    Remote,
    Hashing,
    Noop,
}

impl Default for EmbeddingBackend {
    fn default() -> Self {
        if cfg!(feature = "fastembed") {
            EmbeddingBackend::FastEmbed
        } else {
            EmbeddingBackend::Hashing
        }
    }
}

impl fmt::Display for EmbeddingBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmbeddingBackend::FastEmbed => write!(f, "fastembed"),
            EmbeddingBackend::Remote => write!(f, "remote"),
            EmbeddingBackend::Hashing => write!(f, "hashing"),
            EmbeddingBackend::Noop => write!(f, "noop"),
        }
    }
}

impl FromStr for EmbeddingBackend {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fastembed" | "local" => Ok(EmbeddingBackend::FastEmbed),
            "remote" | "openai" => Ok(EmbeddingBackend::Remote),
            "hashing" => Ok(EmbeddingBackend::Hashing),
            "noop" | "none" => Ok(EmbeddingBackend::Noop),
            _ => Err(ValidationError::UnknownVariant {
                field: "embedding provider",
                value: s.to_string(),
            }),
        }
    }
}

/// Runtime settings, read from `PROFILEMATCH_*` environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct MatcherConfig {
    pub profiles_path: PathBuf,
    pub index_path: PathBuf,
    pub backend: EmbeddingBackend,
    pub api_key: String,
    pub model: Option<String>,
    pub embedding_url: Option<String>,
    pub workers: usize,
    pub strictness: MatchStrictness,
    pub keywords_path: Option<PathBuf>,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            profiles_path: PathBuf::from("./data/users.json"),
            index_path: PathBuf::from("./data/profile_index.db"),
            backend: EmbeddingBackend::default(),
            api_key: String::new(),
            model: None,
            embedding_url: None,
            workers: DEFAULT_WORKERS,
            strictness: MatchStrictness::default(),
            keywords_path: None,
        }
    }
}

impl MatcherConfig {
    pub fn from_env() -> Result<Self, DomainError> {
        Self::from_lookup(|key| std::env::var(format!("{ENV_PREFIX}{key}")).ok())
    }

    /// Build from any key lookup. Keys are given without the prefix.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, DomainError> {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let invalid = |key: &str, e: &dyn fmt::Display| DomainError::Config(format!("{ENV_PREFIX}{key}: {e}"));

        let backend = match get("EMBEDDING_PROVIDER") {
            Some(v) => v.parse::<EmbeddingBackend>().map_err(|e| invalid("EMBEDDING_PROVIDER", &e))?,
            None => defaults.backend,
        };
        let strictness = match get("STRICTNESS") {
            Some(v) => v.parse::<MatchStrictness>().map_err(|e| invalid("STRICTNESS", &e))?,
            None => defaults.strictness,
        };
        let workers = match get("WORKERS") {
            Some(v) => v
                .trim()
                .parse::<usize>()
                .map_err(|e| invalid("WORKERS", &e))?
                .max(1),
            None => defaults.workers,
        };

        Ok(Self {
            profiles_path: get("PROFILES").map(PathBuf::from).unwrap_or(defaults.profiles_path),
            index_path: get("INDEX").map(PathBuf::from).unwrap_or(defaults.index_path),
            backend,
            api_key: get("EMBEDDING_API_KEY").unwrap_or_default(),
            model: get("EMBEDDING_MODEL"),
            embedding_url: get("EMBEDDING_URL"),
            workers,
            strictness,
            keywords_path: get("KEYWORDS").map(PathBuf::from),
        })
    }

    pub fn keyword_tables(&self) -> Result<KeywordTables, DomainError> {
        match &self.keywords_path {
            Some(path) => KeywordTables::from_json_file(path),
            None => Ok(KeywordTables::default()),
        }
    }

    /// The remote provider blocks on `runtime` from worker threads.
    pub fn build_embedder(&self, runtime: Handle) -> Result<Arc<dyn EmbeddingProvider>, DomainError> {
        let embedder: Arc<dyn EmbeddingProvider> = match self.backend {
            EmbeddingBackend::FastEmbed => fastembed_provider()?,
            EmbeddingBackend::Remote => Arc::new(RemoteProvider::new(
                runtime,
                self.api_key.clone(),
                self.model.clone(),
                self.embedding_url.clone(),
                EMBEDDING_DIMENSION,
            )),
            EmbeddingBackend::Hashing => Arc::new(HashingProvider::default()),
            EmbeddingBackend::Noop => Arc::new(NoopProvider),
        };
        Ok(embedder)
    }
}

#[cfg(feature = "fastembed")]
fn fastembed_provider() -> Result<Arc<dyn EmbeddingProvider>, DomainError> {
    use crate::infrastructure::embeddings::minilm::FastEmbedProvider;
    Ok(Arc::new(FastEmbedProvider::new(None)))
}

#[cfg(not(feature = "fastembed"))]
fn fastembed_provider() -> Result<Arc<dyn EmbeddingProvider>, DomainError> {
    Err(DomainError::Config(
        "built without the `fastembed` feature; choose remote or hashing".into(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = MatcherConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, MatcherConfig::default());
        assert_eq!(config.workers, 4);
        assert_eq!(config.strictness, MatchStrictness::Substring);
    }

    #[test]
    fn test_overrides() {
        let config = MatcherConfig::from_lookup(lookup(&[
            ("PROFILES", "/tmp/users.json"),
            ("EMBEDDING_PROVIDER", "hashing"),
            ("WORKERS", "0"),
            ("STRICTNESS", "word_boundary"),
            ("EMBEDDING_MODEL", "text-embedding-3-small"),
        ]))
        .unwrap();
        assert_eq!(config.profiles_path, PathBuf::from("/tmp/users.json"));
        assert_eq!(config.backend, EmbeddingBackend::Hashing);
        assert_eq!(config.workers, 1);
        assert_eq!(config.strictness, MatchStrictness::WordBoundary);
        assert_eq!(config.model.as_deref(), Some("text-embedding-3-small"));
    }

    #[test]
    fn test_invalid_values_are_config_errors() {
        let err = MatcherConfig::from_lookup(lookup(&[("EMBEDDING_PROVIDER", "magic")])).unwrap_err();
        assert!(matches!(err, DomainError::Config(msg) if msg.contains("PROFILEMATCH_EMBEDDING_PROVIDER")));
        assert!(MatcherConfig::from_lookup(lookup(&[("WORKERS", "many")])).is_err());
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let config = MatcherConfig::from_lookup(lookup(&[("INDEX", "  ")])).unwrap();
        assert_eq!(config.index_path, PathBuf::from("./data/profile_index.db"));
    }
}
