// ============================
// crates/backend-lib/src/auth/session.rs
// ============================
//! Cache of recently authenticated users.
use std::{sync::Arc, time::{Duration, Instant}};

use dashmap::DashMap;
use employee_common::{EnrichedUser, UserId};
use metrics::{counter, gauge};

use crate::metrics::{SESSION_CACHED, SESSION_EXPIRED, SESSION_HIT, SESSION_SIZE};

#[derive(Clone)]
struct CacheEntry {
    user: EnrichedUser,
    cached_at: Instant,
}

/// Enriched users keyed by identity, last writer wins
#[derive(Clone)]
pub struct SessionCache {
    entries: Arc<DashMap<UserId, CacheEntry>>,
    ttl: Option<Duration>,
}

impl Default for SessionCache {
    fn default() -> Self {
        Self::new(None)
    }
}

impl SessionCache {
    /// Create a cache. Without a TTL entries live until the process exits.
    pub fn new(ttl: Option<Duration>) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            ttl,
        }
    }

    /// Store a freshly enriched user, replacing any previous snapshot
    pub fn insert(&self, user: EnrichedUser) {
        let id = user.id();
        self.entries.insert(
            id,
            CacheEntry {
                user,
                cached_at: Instant::now(),
            },
        );
        counter!(SESSION_CACHED).increment(1);
        gauge!(SESSION_SIZE).set(self.entries.len() as f64);
    }

    /// Cached user for `id`, unless it has outlived the TTL
    pub fn get(&self, id: &UserId) -> Option<EnrichedUser> {
        let entry = self.entries.get(id)?;
        if self.is_expired(&entry, Instant::now()) {
            return None;
        }
        counter!(SESSION_HIT).increment(1);
        Some(entry.user.clone())
    }

    pub fn remove(&self, id: &UserId) -> Option<EnrichedUser> {
        self.entries.remove(id).map(|(_, entry)| entry.user)
    }

    pub fn contains(&self, id: &UserId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove expired entries, returning how many were dropped
    pub fn purge_expired(&self) -> usize {
        if self.ttl.is_none() {
            return 0;
        }
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !self.is_expired(entry, now));
        let removed = before - self.entries.len();

        if removed > 0 {
            counter!(SESSION_EXPIRED).increment(removed as u64);
            gauge!(SESSION_SIZE).set(self.entries.len() as f64);
        }
        removed
    }

    /// Periodically purge expired entries. Does nothing without a TTL.
    pub fn spawn_cleanup(&self, interval: Duration) -> Option<tokio::task::JoinHandle<()>> {
        self.ttl?;
        let cache = self.clone();
        Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                let removed = cache.purge_expired();
                if removed > 0 {
                    tracing::debug!(removed, "expired session cache entries purged");
                }
            }
        }))
    }

    fn is_expired(&self, entry: &CacheEntry, now: Instant) -> bool {
        self.ttl
            .is_some_and(|ttl| now.duration_since(entry.cached_at) >= ttl)
    }
}
