//! Short-TTL cache of the rendered global feed, one entry per rendering context.
//!
//! Entries live for a fixed TTL, regardless of posts written in the meantime.
//! Reads hold the lock only long enough to copy the value out; on a miss the
//! caller computes without holding any lock, so concurrent misses may compute
//! the same page twice. The last writer wins.
//!
//! The map is bounded: once `max_entries` live entries exist, inserting a new
//! key evicts the one closest to expiry.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;

use crate::SharedClock;

/// Default bound on live entries.
pub const DEFAULT_MAX_ENTRIES: usize = 1024;

struct CacheEntry<V> {
    value: V,
    expires_at: DateTime<Utc>,
}

/// TTL cache for the global index feed.
#[derive(Clone)]
pub struct HomeFeedCache<V> {
    ttl: Duration,
    max_entries: usize,
    clock: SharedClock,
    entries: Arc<RwLock<HashMap<String, CacheEntry<V>>>>,
}

impl<V: Clone> HomeFeedCache<V> {
    pub fn new(ttl: std::time::Duration, clock: SharedClock) -> Self {
        Self {
            ttl: Duration::from_std(ttl).unwrap_or(Duration::MAX),
            max_entries: DEFAULT_MAX_ENTRIES,
            clock,
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Cap the number of live entries (at least one).
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries.max(1);
        self
    }

    /// The cached value for `key`, if one was stored and has not expired.
    pub async fn get(&self, key: &str) -> Option<V> {
        let now = self.clock.utc();
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|entry| now < entry.expires_at)
            .map(|entry| entry.value.clone())
    }

    /// Store `value` under `key` for one TTL from now.
    pub async fn insert(&self, key: &str, value: V) {
        let now = self.clock.utc();
        let expires_at = now
            .checked_add_signed(self.ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        let mut entries = self.entries.write().await;
        entries.retain(|_, entry| now < entry.expires_at);

        if entries.len() >= self.max_entries && !entries.contains_key(key) {
            let oldest = entries
                .iter()
                .min_by_key(|(_, entry)| entry.expires_at)
                .map(|(k, _)| k.clone());
            if let Some(oldest) = oldest {
                tracing::debug!(evicted = %oldest, "home feed cache full");
                entries.remove(&oldest);
            }
        }
        entries.insert(key.to_string(), CacheEntry { value, expires_at });
    }

    /// Return the cached value, or compute, store and return a fresh one.
    ///
    /// Errors from `compute` are returned as-is and nothing is cached.
    pub async fn get_or_try_insert_with<F, Fut, E>(&self, key: &str, compute: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(hit) = self.get(key).await {
            tracing::debug!(key, "home feed cache hit");
            return Ok(hit);
        }

        tracing::debug!(key, "home feed cache miss");
        let value = compute().await?;
        self.insert(key, value.clone()).await;
        Ok(value)
    }

    /// Drop every entry; the next read of any page recomputes.
    pub async fn clear(&self) {
        self.entries.write().await.clear();
        tracing::debug!("home feed cache cleared");
    }

    /// Number of live (unexpired) entries.
    pub async fn len(&self) -> usize {
        let now = self.clock.utc();
        self.entries
            .read()
            .await
            .values()
            .filter(|entry| now < entry.expires_at)
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
