//! Redis-backed result cache (optional).
//!
//! Entries are JSON-encoded `PriceLookup`s stored with a TTL under
//! `pricing:prices:{store}:{article}`.

use std::time::Duration;

use redis::AsyncCommands;
use redis::aio::MultiplexedConnection;
use thiserror::Error;

use pricing_core::ProductKey;

use super::ResultCache;
use crate::pricing_service::PriceLookup;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("redis error: {0}")]
    Redis(String),

    #[error("serialization error: {0}")]
    Serialize(String),
}

/// Shared Redis cache for resolved price sheets.
#[derive(Clone)]
pub struct RedisResultCache {
    conn: MultiplexedConnection,
    ttl: Duration,
}

impl RedisResultCache {
    pub async fn connect(redis_url: impl AsRef<str>, ttl: Duration) -> Result<Self, CacheError> {
        let client = redis::Client::open(redis_url.as_ref())
            .map_err(|e| CacheError::Redis(e.to_string()))?;
        let conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| CacheError::Redis(e.to_string()))?;
        Ok(Self { conn, ttl })
    }

    fn cache_key(key: &ProductKey) -> String {
        format!("pricing:prices:{}:{}", key.store_id, key.article_id)
    }

    async fn try_get(&self, key: &ProductKey) -> Result<Option<PriceLookup>, CacheError> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn
            .get(Self::cache_key(key))
            .await
            .map_err(|e| CacheError::Redis(e.to_string()))?;

        raw.map(|s| serde_json::from_str(&s).map_err(|e| CacheError::Serialize(e.to_string())))
            .transpose()
    }

    async fn try_put(&self, key: &ProductKey, value: &PriceLookup) -> Result<(), CacheError> {
        let payload =
            serde_json::to_string(value).map_err(|e| CacheError::Serialize(e.to_string()))?;
        let mut conn = self.conn.clone();
        conn.set_ex::<_, _, ()>(Self::cache_key(key), payload, self.ttl.as_secs().max(1))
            .await
            .map_err(|e| CacheError::Redis(e.to_string()))
    }
}

#[async_trait::async_trait]
impl ResultCache for RedisResultCache {
    async fn get(&self, key: &ProductKey) -> Option<PriceLookup> {
        match self.try_get(key).await {
            Ok(hit) => hit,
            Err(e) => {
                tracing::warn!(%key, "price cache read failed: {e}");
                None
            }
        }
    }

    async fn put(&self, key: &ProductKey, value: PriceLookup) {
        if let Err(e) = self.try_put(key, &value).await {
            tracing::warn!(%key, "price cache write failed: {e}");
        }
    }
}
