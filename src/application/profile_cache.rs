use crate::domain::entities::profile::{Profile, ProfileId};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

/// In-memory profile store, keyed by id, built once at startup.
///
/// Load order is pinned so candidate lists are stable across searches.
#[derive(Debug, Clone)]
pub struct ProfileCache {
    by_id: HashMap<ProfileId, Arc<Profile>>,
    order: Vec<ProfileId>,
    loaded_at: DateTime<Utc>,
}

impl ProfileCache {
    pub fn from_profiles(profiles: Vec<Profile>) -> Self {
        let mut by_id = HashMap::with_capacity(profiles.len());
        let mut order = Vec::with_capacity(profiles.len());
        for profile in profiles {
            let id = profile.id;
            if by_id.contains_key(&id) {
                warn!(profile_id = id, "duplicate profile id, keeping the first record");
                continue;
            }
            by_id.insert(id, Arc::new(profile));
            order.push(id);
        }
        info!(count = order.len(), "profile cache loaded");
        Self {
            by_id,
            order,
            loaded_at: Utc::now(),
        }
    }

    pub fn empty() -> Self {
        Self {
            by_id: HashMap::new(),
            order: Vec::new(),
            loaded_at: Utc::now(),
        }
    }

    pub fn get(&self, id: ProfileId) -> Option<Arc<Profile>> {
        self.by_id.get(&id).cloned()
    }

    pub fn contains(&self, id: ProfileId) -> bool {
        self.by_id.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    /// Every profile, in load order.
    pub fn all(&self) -> Vec<Arc<Profile>> {
        self.order
            .iter()
            .filter_map(|id| self.by_id.get(id).cloned())
            .collect()
    }

    /// Every profile except `exclude`, in load order. An absent id is a no-op.
    pub fn candidates_excluding(&self, exclude: Option<ProfileId>) -> Vec<Arc<Profile>> {
        let candidates: Vec<Arc<Profile>> = self
            .order
            .iter()
            .filter(|id| Some(**id) != exclude)
            .filter_map(|id| self.by_id.get(id).cloned())
            .collect();
        if let Some(id) = exclude {
            info!(excluded = id, remaining = candidates.len(), "excluded requesting user from candidates");
        }
        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn profile(id: i64, name: &str) -> Profile {
        Profile::from_value(json!({
            "id": id,
            "name": name,
            "bio": "bio",
            "location": "Berlin",
            "user_status": "active",
            "current_role": "engineer",
            "experience_level": "mid",
            "networking_intent": "hiring",
            "pivot_status": "consistent",
            "domain_expertise": [],
            "skill_levels": {},
            "last_active": "2024-01-01"
        }))
        .unwrap()
    }

    #[test]
    fn test_load_order_is_pinned() {
        let cache = ProfileCache::from_profiles(vec![profile(3, "c"), profile(1, "a"), profile(2, "b")]);
        let ids: Vec<i64> = cache.all().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let cache = ProfileCache::from_profiles(vec![profile(1, "first"), profile(1, "second")]);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(1).unwrap().name, "first");
    }

    #[test]
    fn test_exclusion_removes_exactly_one() {
        let cache = ProfileCache::from_profiles(vec![profile(1, "a"), profile(2, "b"), profile(3, "c")]);
        let ids: Vec<i64> = cache.candidates_excluding(Some(2)).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(cache.candidates_excluding(Some(99)).len(), 3);
        assert_eq!(cache.candidates_excluding(None).len(), 3);
    }

    #[test]
    fn test_empty_cache() {
        let cache = ProfileCache::empty();
        assert!(cache.is_empty());
        assert!(cache.get(1).is_none());
        assert!(!cache.contains(1));
    }
}
