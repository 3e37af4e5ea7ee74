//! Read-through wrapping of query producers.

use std::{future::Future, sync::Arc};

use metrics::counter;
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::{debug, warn};

use super::{
    config::CacheConfig,
    keys::{CacheKey, RequestIdentity},
    serializer::{JsonSerializer, Payload, SerializerError, Shape},
    store::{CacheStore, CacheStoreError},
};
use crate::infra::telemetry::{CACHE_HIT_TOTAL, CACHE_MISS_TOTAL, CACHE_STORE_ERROR_TOTAL};

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("request identity is required to derive a cache key")]
    MissingIdentity,
    #[error(transparent)]
    Store(#[from] CacheStoreError),
    #[error(transparent)]
    Serialization(#[from] SerializerError),
}

#[derive(Clone)]
pub struct CacheManager {
    store: Option<Arc<dyn CacheStore>>,
    serializer: JsonSerializer,
    config: CacheConfig,
}

impl CacheManager {
    pub fn new(store: Arc<dyn CacheStore>, config: CacheConfig) -> Self {
        Self {
            store: Some(store),
            serializer: JsonSerializer,
            config,
        }
    }

    /// A manager that always runs the producer and stores nothing.
    pub fn disabled() -> Self {
        Self {
            store: None,
            serializer: JsonSerializer,
            config: CacheConfig::default(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.store.is_some()
    }

    /// Serve a single entity from cache, or produce and store it.
    ///
    /// Producer errors are returned as-is and never cached. `T` must serialise to a
    /// non-array JSON value; array-shaped results are served but not stored.
    pub async fn wrap_one<T, E, F, Fut>(
        &self,
        prefix: &'static str,
        identity: &RequestIdentity,
        producer: F,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        E: From<CacheError>,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let payload = self
            .read_through(prefix, identity, Shape::One, || async {
                producer().await.map(Payload::One)
            })
            .await?;

        match payload {
            Payload::One(value) => Ok(value),
            Payload::Many(_) => Err(CacheError::from(SerializerError::ShapeMismatch {
                expected: Shape::One,
            })
            .into()),
        }
    }

    /// Serve an ordered list from cache, or produce and store it.
    pub async fn wrap_many<T, E, F, Fut>(
        &self,
        prefix: &'static str,
        identity: &RequestIdentity,
        producer: F,
    ) -> Result<Vec<T>, E>
    where
        T: Serialize + DeserializeOwned,
        E: From<CacheError>,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<T>, E>>,
    {
        let payload = self
            .read_through(prefix, identity, Shape::Many, || async {
                producer().await.map(Payload::Many)
            })
            .await?;

        match payload {
            Payload::Many(values) => Ok(values),
            Payload::One(_) => Err(CacheError::from(SerializerError::ShapeMismatch {
                expected: Shape::Many,
            })
            .into()),
        }
    }

    async fn read_through<T, E, F, Fut>(
        &self,
        prefix: &'static str,
        identity: &RequestIdentity,
        shape: Shape,
        producer: F,
    ) -> Result<Payload<T>, E>
    where
        T: Serialize + DeserializeOwned,
        E: From<CacheError>,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Payload<T>, E>>,
    {
        let Some(store) = self.store.as_ref() else {
            return producer().await;
        };

        let key = CacheKey::new(prefix, identity);

        if let Some(payload) = self.lookup(store.as_ref(), prefix, &key, shape).await? {
            counter!(CACHE_HIT_TOTAL, "prefix" => prefix).increment(1);
            debug!(target: "kinoteka::cache", key = %key, "cache hit");
            return Ok(payload);
        }

        counter!(CACHE_MISS_TOTAL, "prefix" => prefix).increment(1);
        debug!(target: "kinoteka::cache", key = %key, "cache miss");

        let payload = producer().await?;
        self.persist(store.as_ref(), prefix, &key, &payload).await?;
        Ok(payload)
    }

    async fn lookup<T: DeserializeOwned>(
        &self,
        store: &dyn CacheStore,
        prefix: &'static str,
        key: &CacheKey,
        shape: Shape,
    ) -> Result<Option<Payload<T>>, CacheError> {
        let raw = match store.get(key.as_str()).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Ok(None),
            Err(err) => {
                self.absorb(prefix, "get", key, err)?;
                return Ok(None);
            }
        };

        match self.serializer.deserialize(&raw, shape) {
            Ok(payload) => Ok(Some(payload)),
            Err(err) => {
                warn!(
                    target: "kinoteka::cache",
                    key = %key,
                    error = %err,
                    "Discarding undecodable cache entry"
                );
                Ok(None)
            }
        }
    }

    async fn persist<T: Serialize>(
        &self,
        store: &dyn CacheStore,
        prefix: &'static str,
        key: &CacheKey,
        payload: &Payload<T>,
    ) -> Result<(), CacheError> {
        let raw = self.serializer.serialize(payload)?;
        if matches!(payload, Payload::One(_)) && raw.starts_with('[') {
            warn!(
                target: "kinoteka::cache",
                key = %key,
                "Single-entity payload serialised as an array; not caching"
            );
            return Ok(());
        }
        match store.set(key.as_str(), raw, self.config.ttl).await {
            Ok(()) => Ok(()),
            Err(err) => self.absorb(prefix, "set", key, err),
        }
    }

    /// Count a store failure and decide whether the request may continue without the cache.
    fn absorb(
        &self,
        prefix: &'static str,
        op: &'static str,
        key: &CacheKey,
        err: CacheStoreError,
    ) -> Result<(), CacheError> {
        counter!(CACHE_STORE_ERROR_TOTAL, "prefix" => prefix, "op" => op).increment(1);

        match err {
            CacheStoreError::Unavailable(ref reason) if self.config.fail_open => {
                warn!(
                    target: "kinoteka::cache",
                    op,
                    key = %key,
                    reason = %reason,
                    "Cache store unavailable; continuing without cache"
                );
                Ok(())
            }
            err => Err(CacheError::Store(err)),
        }
    }
}
