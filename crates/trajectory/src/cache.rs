//! Trajectory cache seam and the lifetime policy for cached entries.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use tracker_config::CachePolicy;

use crate::model::TrajectoryData;

#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub data: TrajectoryData,
    pub stored_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Storage for reconstructed trajectories, keyed by launch id.
pub trait TrajectoryCache: Send + Sync {
    /// Fresh entry for `key`, if any. Expired entries are never returned.
    fn get(&self, key: &str, now: DateTime<Utc>) -> Option<CacheEntry>;
    fn put(&self, key: &str, data: TrajectoryData, now: DateTime<Utc>, ttl: Duration);
    /// Drop the entry; returns whether one existed.
    fn invalidate(&self, key: &str) -> bool;
}

impl<T: TrajectoryCache + ?Sized> TrajectoryCache for Arc<T> {
    fn get(&self, key: &str, now: DateTime<Utc>) -> Option<CacheEntry> {
        (**self).get(key, now)
    }

    fn put(&self, key: &str, data: TrajectoryData, now: DateTime<Utc>, ttl: Duration) {
        (**self).put(key, data, now, ttl)
    }

    fn invalidate(&self, key: &str) -> bool {
        (**self).invalidate(key)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryTrajectoryCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl InMemoryTrajectoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // A poisoned map still holds whole entries; keep serving them.
    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl TrajectoryCache for InMemoryTrajectoryCache {
    fn get(&self, key: &str, now: DateTime<Utc>) -> Option<CacheEntry> {
        let mut entries = self.lock();
        match entries.get(key) {
            Some(entry) if entry.is_fresh(now) => Some(entry.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    fn put(&self, key: &str, data: TrajectoryData, now: DateTime<Utc>, ttl: Duration) {
        let entry = CacheEntry {
            data,
            stored_at: now,
            expires_at: now + ttl,
        };
        self.lock().insert(key.to_string(), entry);
    }

    fn invalidate(&self, key: &str) -> bool {
        self.lock().remove(key).is_some()
    }
}

/// Cache lifetime for a trajectory whose launch is `time_to_launch` away.
/// Launches already in the past get the floor lifetime.
pub fn cache_ttl(time_to_launch: Duration, policy: &CachePolicy) -> Duration {
    let hours = time_to_launch.num_seconds() as f64 / 3600.0;
    policy
        .tiers
        .iter()
        .find(|tier| hours > tier.min_hours_before_launch)
        .map(|tier| Duration::minutes(tier.ttl_minutes))
        .unwrap_or_else(|| Duration::minutes(policy.floor_ttl_minutes))
}
