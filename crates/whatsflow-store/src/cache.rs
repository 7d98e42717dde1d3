//! Thread-state cache with LRU eviction and TTL support.
//!
//! The server keeps one entry per drafting thread: which flow it produced,
//! its preview URL, the plan that generated it. Entries are small and purely
//! advisory, so losing one to eviction or expiry only costs a re-generate.

use std::num::NonZeroUsize;
use std::time::Duration;

use chrono::{DateTime, Utc};
use lru::LruCache;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::trace;
use whatsflow_types::{FlowId, ThreadId};

use crate::ttl::ExpiryLedger;

// ─────────────────────────────────────────────────────────────────────────────
// Thread state
// ─────────────────────────────────────────────────────────────────────────────

/// What the server remembers about one drafting thread.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadState {
    pub thread_id: ThreadId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flow_id: Option<FlowId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flow_plan: Option<Value>,
    pub updated_at: DateTime<Utc>,
}

impl ThreadState {
    pub fn new(thread_id: ThreadId) -> Self {
        Self {
            thread_id,
            flow_id: None,
            preview_url: None,
            flow_plan: None,
            updated_at: Utc::now(),
        }
    }

    /// Bump the modification timestamp.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Cache
// ─────────────────────────────────────────────────────────────────────────────

/// Cache configuration.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of cached entries.
    pub max_entries: usize,
    /// TTL duration (None means no expiration).
    pub ttl: Option<Duration>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 1024,
            ttl: Some(Duration::from_secs(3600)),
        }
    }
}

/// Inner state protected by the lock.
struct CacheInner<V> {
    lru: LruCache<String, V>,
    ttl: ExpiryLedger,
}

/// In-memory cache with LRU eviction and optional TTL.
///
/// Expired entries drop on access; inserting at capacity evicts the least
/// recently used entry.
pub struct SessionCache<V> {
    inner: Mutex<CacheInner<V>>,
    config: CacheConfig,
}

impl<V: Clone> SessionCache<V> {
    pub fn new(config: CacheConfig) -> Self {
        let cap =
            NonZeroUsize::new(config.max_entries).unwrap_or_else(|| NonZeroUsize::new(1).unwrap());
        let inner = CacheInner {
            lru: LruCache::new(cap),
            ttl: ExpiryLedger::new(config.ttl),
        };
        Self {
            inner: Mutex::new(inner),
            config,
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Get a value, refreshing its TTL. Expired entries are dropped.
    pub fn get(&self, key: &str) -> Option<V> {
        let mut inner = self.inner.lock();
        if inner.ttl.is_expired(key) {
            if inner.lru.pop(key).is_some() {
                trace!(key, "cache entry expired");
            }
            inner.ttl.remove(key);
            return None;
        }
        let value = inner.lru.get(key).cloned();
        if value.is_some() {
            inner.ttl.touch(key);
        }
        value
    }

    /// Insert a value, evicting the least recently used entry at capacity.
    pub fn insert(&self, key: impl Into<String>, value: V) {
        let key = key.into();
        let mut inner = self.inner.lock();
        if let Some((evicted, _)) = inner.lru.push(key.clone(), value) {
            // push returns the displaced entry: either the old value under
            // the same key, or the LRU entry that made room.
            if evicted != key {
                inner.ttl.remove(&evicted);
                trace!(key = %evicted, "cache entry evicted");
            }
        }
        inner.ttl.touch(&key);
    }

    /// Remove an entry, returning it if present and not expired.
    pub fn remove(&self, key: &str) -> Option<V> {
        let mut inner = self.inner.lock();
        let expired = inner.ttl.is_expired(key);
        inner.ttl.remove(key);
        let value = inner.lru.pop(key);
        if expired { None } else { value }
    }

    /// Drop every expired entry. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let mut inner = self.inner.lock();
        let expired = inner.ttl.drain_expired();
        for key in &expired {
            inner.lru.pop(key);
        }
        expired.len()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().lru.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().lru.is_empty()
    }

    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        let keys: Vec<String> = inner.lru.iter().map(|(key, _)| key.clone()).collect();
        for key in keys {
            inner.ttl.remove(&key);
        }
        inner.lru.clear();
    }
}

impl<V: Clone> Default for SessionCache<V> {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}
