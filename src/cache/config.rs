//! Runtime cache parameters derived from `[cache]` settings.

use std::{num::NonZeroUsize, time::Duration};

const DEFAULT_TTL_SECONDS: u64 = 300;
const DEFAULT_MEMORY_CAPACITY: usize = 10_000;

#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Lifetime of every stored entry.
    pub ttl: Duration,
    /// Entry bound for the in-process store.
    pub memory_capacity: usize,
    /// Treat an unreachable store as a miss instead of failing the request.
    pub fail_open: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(DEFAULT_TTL_SECONDS),
            memory_capacity: DEFAULT_MEMORY_CAPACITY,
            fail_open: true,
        }
    }
}

impl From<&crate::config::CacheSettings> for CacheConfig {
    fn from(settings: &crate::config::CacheSettings) -> Self {
        Self {
            ttl: settings.ttl,
            memory_capacity: settings.memory_capacity,
            fail_open: settings.fail_open,
        }
    }
}

impl CacheConfig {
    /// Memory capacity as NonZeroUsize, clamping to 1 if zero.
    pub fn memory_capacity_non_zero(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.memory_capacity).unwrap_or(NonZeroUsize::MIN)
    }
}
