//! Redis-backed cache store.

use std::time::Duration;

use async_trait::async_trait;
use redis::{AsyncCommands, RedisError, aio::ConnectionManager};
use tracing::info;

use super::store::{CacheStore, CacheStoreError};

/// Shared Redis handle; the connection manager multiplexes requests and reconnects
/// after the connection drops.
#[derive(Clone)]
pub struct RedisStore {
    connection: ConnectionManager,
}

impl RedisStore {
    pub async fn connect(url: &str) -> Result<Self, CacheStoreError> {
        let client = redis::Client::open(url).map_err(classify)?;
        let connection = client.get_connection_manager().await.map_err(classify)?;
        info!(target: "kinoteka::cache::redis_store", "Connected to Redis");
        Ok(Self { connection })
    }
}

#[async_trait]
impl CacheStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheStoreError> {
        let mut connection = self.connection.clone();
        connection.get(key).await.map_err(classify)
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheStoreError> {
        let mut connection = self.connection.clone();
        // SET EX rejects a zero expiry.
        let seconds = ttl.as_secs().max(1);
        connection
            .set_ex::<_, _, ()>(key, value, seconds)
            .await
            .map_err(classify)
    }
}

fn classify(err: RedisError) -> CacheStoreError {
    if err.is_io_error()
        || err.is_connection_refusal()
        || err.is_connection_dropped()
        || err.is_timeout()
    {
        CacheStoreError::Unavailable(err.to_string())
    } else {
        CacheStoreError::Command(err.to_string())
    }
}
