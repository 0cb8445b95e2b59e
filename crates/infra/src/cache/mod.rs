//! Resolved-result cache boundary.
//!
//! The pricing service memoizes each `(store, article)` lookup through this
//! explicit `get`/`put` interface. Both found sheets and "no prices" outcomes
//! are cached.
//!
//! Cache failures must never fail a request: implementations log and degrade
//! to a miss (on `get`) or a dropped write (on `put`).

pub mod in_memory;
#[cfg(feature = "redis")]
pub mod redis_cache;

use std::sync::Arc;

use pricing_core::ProductKey;

use crate::pricing_service::PriceLookup;

pub use in_memory::InMemoryResultCache;
#[cfg(feature = "redis")]
pub use redis_cache::{CacheError, RedisResultCache};

#[async_trait::async_trait]
pub trait ResultCache: Send + Sync {
    async fn get(&self, key: &ProductKey) -> Option<PriceLookup>;
    async fn put(&self, key: &ProductKey, value: PriceLookup);
}

#[async_trait::async_trait]
impl<C> ResultCache for Arc<C>
where
    C: ResultCache + ?Sized,
{
    async fn get(&self, key: &ProductKey) -> Option<PriceLookup> {
        (**self).get(key).await
    }

    async fn put(&self, key: &ProductKey, value: PriceLookup) {
        (**self).put(key, value).await
    }
}
