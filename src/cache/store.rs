//! Key/value stores backing the response cache.

use std::{
    sync::RwLock,
    time::{Duration, Instant},
};

use async_trait::async_trait;
use lru::LruCache;
use thiserror::Error;

use super::{
    config::CacheConfig,
    lock::{rw_read, rw_write},
};

const SOURCE: &str = "cache::store";

#[derive(Debug, Clone, Error)]
pub enum CacheStoreError {
    /// The store could not be reached: connection refused, dropped or timed out.
    #[error("cache store unavailable: {0}")]
    Unavailable(String),
    #[error("cache store command failed: {0}")]
    Command(String),
}

/// Minimal key/value contract with per-entry expiry.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheStoreError>;

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheStoreError>;
}

struct Entry {
    /// `None` when the ttl reaches past the clock's range.
    expires_at: Option<Instant>,
    payload: String,
}

/// In-process store for tests and single-node deployments.
///
/// Bounded by `memory_capacity` with LRU eviction; expired entries read as absent
/// and are dropped on access.
pub struct MemoryStore {
    entries: RwLock<LruCache<String, Entry>>,
}

impl MemoryStore {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            entries: RwLock::new(LruCache::new(config.memory_capacity_non_zero())),
        }
    }

    pub fn len(&self) -> usize {
        rw_read(&self.entries, SOURCE, "len").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lookup(&self, key: &str, now: Instant) -> Option<String> {
        {
            let entries = rw_read(&self.entries, SOURCE, "get");
            match entries.peek(key) {
                Some(entry) if entry.expires_at.is_none_or(|at| at > now) => {
                    return Some(entry.payload.clone());
                }
                Some(_) => {}
                None => return None,
            }
        }

        let mut entries = rw_write(&self.entries, SOURCE, "evict_expired");
        if entries
            .peek(key)
            .is_some_and(|entry| entry.expires_at.is_some_and(|at| at <= now))
        {
            entries.pop(key);
        }
        None
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheStoreError> {
        Ok(self.lookup(key, Instant::now()))
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheStoreError> {
        let entry = Entry {
            expires_at: Instant::now().checked_add(ttl),
            payload: value,
        };
        rw_write(&self.entries, SOURCE, "set").put(key.to_string(), entry);
        Ok(())
    }
}
