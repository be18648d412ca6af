use crate::application::profile_cache::ProfileCache;
use crate::domain::entities::profile::{Profile, ProfileId};
use crate::domain::values::activity_status::ActivityStatus;
use crate::domain::values::current_role::CurrentRole;
use crate::domain::values::experience_level::ExperienceLevel;
use crate::domain::values::networking_intent::NetworkingIntent;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// What startup managed to bring up. Fixed once the matcher is built.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ServiceStatus {
    pub embedding_model: bool,
    pub vector_index: bool,
    pub cache_loaded: bool,
    pub last_error: Option<String>,
}

impl ServiceStatus {
    /// Searches need the model and at least one cached profile.
    pub fn services_ready(&self) -> bool {
        self.embedding_model && self.cache_loaded
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthState {
    Healthy,
    /// Serving, but through brute-force search or after a recovered error.
    Degraded,
    Unhealthy,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: HealthState,
    pub services_ready: bool,
    pub embedding_model: bool,
    pub vector_index: bool,
    pub users_loaded: usize,
    pub cache_loaded_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl HealthReport {
    pub fn new(status: &ServiceStatus, cache: &ProfileCache) -> Self {
        let state = if !status.services_ready() {
            HealthState::Unhealthy
        } else if !status.vector_index || status.last_error.is_some() {
            HealthState::Degraded
        } else {
            HealthState::Healthy
        };
        Self {
            status: state,
            services_ready: status.services_ready(),
            embedding_model: status.embedding_model,
            vector_index: status.vector_index,
            users_loaded: cache.len(),
            cache_loaded_at: status.cache_loaded.then(|| cache.loaded_at()),
            last_error: status.last_error.clone(),
            timestamp: Utc::now(),
        }
    }
}

/// Directory view of a cached profile.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileSummary {
    pub id: ProfileId,
    pub name: String,
    pub bio: String,
    pub location: String,
    pub domain_expertise: Vec<String>,
    pub current_role: CurrentRole,
    pub experience_level: ExperienceLevel,
    pub networking_intent: NetworkingIntent,
    pub activity_status: ActivityStatus,
    pub activity_display: String,
    pub conversation_count: usize,
    pub remote_preference: String,
}

impl ProfileSummary {
    pub fn new(profile: &Profile, today: NaiveDate) -> Self {
        Self {
            id: profile.id,
            name: profile.name.clone(),
            bio: profile.bio.clone(),
            location: profile.location.clone(),
            domain_expertise: profile.domain_expertise.clone(),
            current_role: profile.current_role,
            experience_level: profile.experience_level,
            networking_intent: profile.networking_intent,
            activity_status: profile.activity_status(today),
            activity_display: profile.activity_display(today),
            conversation_count: profile.conversation_count(),
            remote_preference: profile.remote_preference.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UserDirectory {
    pub users: Vec<ProfileSummary>,
    pub total: usize,
    pub timestamp: DateTime<Utc>,
}

impl UserDirectory {
    pub fn new(cache: &ProfileCache, today: NaiveDate) -> Self {
        let users: Vec<ProfileSummary> = cache
            .all()
            .iter()
            .map(|p| ProfileSummary::new(p, today))
            .collect();
        Self {
            total: users.len(),
            users,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(model: bool, index: bool, cache: bool) -> ServiceStatus {
        ServiceStatus {
            embedding_model: model,
            vector_index: index,
            cache_loaded: cache,
            last_error: None,
        }
    }

    #[test]
    fn test_health_states() {
        let cache = ProfileCache::empty();
        assert_eq!(HealthReport::new(&status(true, true, true), &cache).status, HealthState::Healthy);
        assert_eq!(HealthReport::new(&status(true, false, true), &cache).status, HealthState::Degraded);
        assert_eq!(HealthReport::new(&status(false, true, true), &cache).status, HealthState::Unhealthy);
        assert_eq!(HealthReport::new(&status(true, true, false), &cache).status, HealthState::Unhealthy);
    }

    #[test]
    fn test_last_error_degrades() {
        let mut s = status(true, true, true);
        s.last_error = Some("index rejected".into());
        let report = HealthReport::new(&s, &ProfileCache::empty());
        assert_eq!(report.status, HealthState::Degraded);
        assert!(report.services_ready);
    }

    #[test]
    fn test_cache_timestamp_only_when_loaded() {
        let report = HealthReport::new(&status(false, false, false), &ProfileCache::empty());
        assert!(report.cache_loaded_at.is_none());
        assert_eq!(report.users_loaded, 0);
    }
}
