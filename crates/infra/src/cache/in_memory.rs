use std::collections::HashMap;
use std::sync::RwLock;

use pricing_core::ProductKey;

use super::ResultCache;
use crate::pricing_service::PriceLookup;

/// Process-local result cache (unbounded, no expiry).
#[derive(Debug, Default)]
pub struct InMemoryResultCache {
    inner: RwLock<HashMap<ProductKey, PriceLookup>>,
}

impl InMemoryResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait::async_trait]
impl ResultCache for InMemoryResultCache {
    async fn get(&self, key: &ProductKey) -> Option<PriceLookup> {
        let map = self.inner.read().ok()?;
        map.get(key).cloned()
    }

    async fn put(&self, key: &ProductKey, value: PriceLookup) {
        if let Ok(mut map) = self.inner.write() {
            map.insert(key.clone(), value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_then_get_returns_value() {
        let cache = InMemoryResultCache::new();
        let key = ProductKey::parse("7001", "1").unwrap();

        assert!(cache.get(&key).await.is_none());
        cache.put(&key, PriceLookup::NoPrices).await;

        assert_eq!(cache.get(&key).await, Some(PriceLookup::NoPrices));
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn keys_are_isolated_per_store() {
        let cache = InMemoryResultCache::new();
        let a = ProductKey::parse("7001", "1").unwrap();
        let b = ProductKey::parse("7002", "1").unwrap();

        cache.put(&a, PriceLookup::NoPrices).await;
        assert!(cache.get(&b).await.is_none());
    }
}
