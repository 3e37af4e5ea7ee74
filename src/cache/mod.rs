//! Read-through response cache.
//!
//! Results are stored under `prefix:identity` keys, where the identity is derived from
//! the incoming request, and expire after a fixed TTL. Nothing is ever invalidated.
//!
//! ```toml
//! [cache]
//! backend = "redis"     # redis | memory | disabled
//! ttl_seconds = 300
//! memory_capacity = 10000
//! fail_open = true
//! ```

mod config;
mod keys;
mod lock;
mod manager;
mod redis_store;
mod serializer;
mod store;

pub use config::CacheConfig;
pub use keys::{CacheKey, RequestIdentity, canonical_query};
pub use manager::{CacheError, CacheManager};
pub use redis_store::RedisStore;
pub use serializer::{JsonSerializer, Payload, SerializerError, Shape};
pub use store::{CacheStore, CacheStoreError, MemoryStore};

/// Cache prefixes, one per cached operation.
pub mod prefixes {
    pub const FILMS_ALL: &str = "films_all";
    pub const FILMS_SEARCH: &str = "films_search";
    pub const FILM: &str = "film";
    pub const GENRES_ALL: &str = "genres_all";
    pub const GENRE: &str = "genre";
    pub const FILMS_BY_GENRE: &str = "films_by_genre";
    pub const PERSONS_ALL: &str = "person_all";
    pub const PERSONS_SEARCH: &str = "person_search";
    pub const PERSON: &str = "person";
    pub const FILMS_BY_PERSON: &str = "films_by_person";
}
