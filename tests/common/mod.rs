//! Shared test helpers.
#![allow(dead_code)]

use chrono::{Duration, Local};
use profilematch::domain::entities::profile::Profile;
use profilematch::domain::error::EmbeddingError;
use profilematch::domain::ports::embedding_port::EmbeddingProvider;
use profilematch::infrastructure::embeddings::hashing::HashingProvider;
use profilematch::infrastructure::worker_pool::WorkerPool;
use profilematch::{MatcherParts, ProfileMatcher};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// ISO date `days` before today, in local time like the search path.
pub fn days_ago(days: i64) -> String {
    (Local::now().date_naive() - Duration::days(days))
        .format("%Y-%m-%d")
        .to_string()
}

pub fn make_profile(id: i64, name: &str, bio: &str) -> Profile {
    profile_with(id, name, bio, json!({}))
}

/// A profile with `overrides` merged over sensible defaults.
pub fn profile_with(id: i64, name: &str, bio: &str, overrides: serde_json::Value) -> Profile {
    let mut raw = json!({
        "id": id,
        "name": name,
        "bio": bio,
        "location": "Amsterdam",
        "user_status": "active",
        "current_role": "engineer",
        "experience_level": "mid",
        "networking_intent": "open_to_opportunities",
        "pivot_status": "consistent",
        "domain_expertise": [],
        "skill_levels": {},
        "remote_preference": "hybrid",
        "conversations": [],
        "last_active": days_ago(30)
    });
    if let (Some(base), Some(extra)) = (raw.as_object_mut(), overrides.as_object()) {
        for (k, v) in extra {
            base.insert(k.clone(), v.clone());
        }
    }
    Profile::from_value(raw).unwrap()
}

pub fn fintech_profile(id: i64) -> Profile {
    profile_with(
        id,
        "Ada Okafor",
        "Fintech expert building payments and banking infrastructure",
        json!({
            "domain_expertise": ["fintech"],
            "skill_levels": {"payments": "expert"},
            "last_active": days_ago(0)
        }),
    )
}

pub fn sample_profiles() -> Vec<Profile> {
    vec![
        fintech_profile(1),
        make_profile(2, "Ravi Menon", "React developer shipping web apps for retail brands"),
        make_profile(3, "Lena Hoffmann", "Climate scientist modelling carbon capture in soils"),
        make_profile(4, "Tom Becker", "Machine learning researcher working on speech models"),
        make_profile(5, "Sara Lind", "Product designer focused on onboarding flows"),
        make_profile(6, "Kofi Mensah", "Solidity auditor reviewing smart contracts for DeFi"),
    ]
}

pub fn hashing_provider() -> Arc<dyn EmbeddingProvider> {
    Arc::new(HashingProvider::default())
}

pub fn pool() -> Arc<WorkerPool> {
    Arc::new(WorkerPool::new(2))
}

/// A ready matcher over `profiles`, brute-force mode.
pub async fn setup(profiles: Vec<Profile>) -> ProfileMatcher {
    ProfileMatcher::from_parts(MatcherParts::new(hashing_provider(), profiles, pool())).await
}

pub fn write_profiles(dir: &std::path::Path, profiles: &[Profile]) -> std::path::PathBuf {
    let path = dir.join("users.json");
    std::fs::write(&path, serde_json::to_string(profiles).unwrap()).unwrap();
    path
}

/// Hashing embeddings reported under a different model name.
pub struct RenamedProvider {
    name: &'static str,
    inner: HashingProvider,
}

impl RenamedProvider {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            inner: HashingProvider::default(),
        }
    }
}

impl EmbeddingProvider for RenamedProvider {
    fn name(&self) -> &str {
        self.name
    }

    fn dimension(&self) -> usize {
        self.inner.dimension()
    }

    fn load(&self) -> Result<(), EmbeddingError> {
        self.inner.load()
    }

    fn is_loaded(&self) -> bool {
        self.inner.is_loaded()
    }

    fn encode(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.inner.encode(text)
    }
}

/// How a [`BrokenAfterStartup`] provider fails once the startup probe is done.
#[derive(Clone, Copy)]
pub enum Breakage {
    Error,
    Panic,
}

/// Loads and answers the startup probe, then fails every later encode.
pub struct BrokenAfterStartup {
    inner: HashingProvider,
    calls: AtomicUsize,
    breakage: Breakage,
}

impl BrokenAfterStartup {
    pub fn new(breakage: Breakage) -> Self {
        Self {
            inner: HashingProvider::default(),
            calls: AtomicUsize::new(0),
            breakage,
        }
    }
}

impl EmbeddingProvider for BrokenAfterStartup {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn dimension(&self) -> usize {
        self.inner.dimension()
    }

    fn load(&self) -> Result<(), EmbeddingError> {
        self.inner.load()
    }

    fn is_loaded(&self) -> bool {
        self.inner.is_loaded()
    }

    fn encode(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            return self.inner.encode(text);
        }
        match self.breakage {
            Breakage::Error => Err(EmbeddingError::EncodingFailure("model session crashed".to_string())),
            Breakage::Panic => panic!("model session crashed"),
        }
    }
}
