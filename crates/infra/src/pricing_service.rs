//! Read-through pricing service.
//!
//! `store -> resolver -> cache`, keyed by `(store, article)`:
//!
//! 1. serve from the result cache when possible;
//! 2. otherwise take the per-key gate so only one caller per key loads and
//!    resolves, while concurrent callers for the same key wait;
//! 3. re-check the cache under the gate (a waiter usually finds the result
//!    the first caller just stored), then load, resolve and cache.
//!
//! Unknown products and products without price records both come back as
//! `PriceLookup::NoPrices`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

use pricing_core::{DomainError, ProductKey};
use pricing_prices::{resolve_with, ArticleMetadata, ResolutionPolicy, ResolvedPrice};

use crate::cache::ResultCache;
use crate::record_store::{RecordStore, StoreError};

/// A product's metadata together with its resolved price timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceSheet {
    pub metadata: ArticleMetadata,
    pub prices: Vec<ResolvedPrice>,
}

/// Outcome of a price lookup (this is what gets cached).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "sheet", rename_all = "snake_case")]
pub enum PriceLookup {
    Found(PriceSheet),
    NoPrices,
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

type Gate = Arc<tokio::sync::Mutex<()>>;

pub struct PricingService<S, C> {
    store: S,
    cache: C,
    policy: ResolutionPolicy,
    inflight: Mutex<HashMap<ProductKey, Inflight>>,
}

impl<S, C> PricingService<S, C>
where
    S: RecordStore,
    C: ResultCache,
{
    pub fn new(store: S, cache: C, policy: ResolutionPolicy) -> Self {
        Self {
            store,
            cache,
            policy,
            inflight: Mutex::new(HashMap::new()),
        }
    }

    pub fn policy(&self) -> ResolutionPolicy {
        self.policy
    }

    /// Resolved prices for one product, read through the cache.
    #[instrument(
        skip(self),
        fields(store_id = %key.store_id, article_id = %key.article_id),
        err
    )]
    pub async fn get_prices(&self, key: &ProductKey) -> Result<PriceLookup, ServiceError> {
        if let Some(hit) = self.cache.get(key).await {
            tracing::debug!("price cache hit");
            return Ok(hit);
        }

        let inflight = InflightGuard::acquire(&self.inflight, key);
        let _permit = inflight.gate.lock().await;

        if let Some(hit) = self.cache.get(key).await {
            tracing::debug!("price cache filled while waiting");
            return Ok(hit);
        }

        let lookup = self.load_and_resolve(key).await?;
        self.cache.put(key, lookup.clone()).await;
        Ok(lookup)
    }

    async fn load_and_resolve(&self, key: &ProductKey) -> Result<PriceLookup, ServiceError> {
        let Some(article) = self.store.find_article_prices(key).await? else {
            tracing::info!("unknown product");
            return Ok(PriceLookup::NoPrices);
        };

        if article.records.is_empty() {
            tracing::info!("product has no price records");
            return Ok(PriceLookup::NoPrices);
        }

        let prices = resolve_with(&article.records, self.policy)?;
        tracing::info!(
            records = article.records.len(),
            resolved = prices.len(),
            overlapped = prices.iter().filter(|p| p.overlapped).count(),
            "resolved price timeline"
        );

        Ok(PriceLookup::Found(PriceSheet {
            metadata: article.metadata,
            prices,
        }))
    }
}

/// Per-key gate plus the number of callers currently holding it.
#[derive(Default)]
struct Inflight {
    gate: Gate,
    holders: usize,
}

/// Registers the caller on the key's gate and deregisters it on drop (also
/// on cancellation). The table entry goes away with its last holder.
struct InflightGuard<'a> {
    table: &'a Mutex<HashMap<ProductKey, Inflight>>,
    key: ProductKey,
    gate: Gate,
}

impl<'a> InflightGuard<'a> {
    fn acquire(table: &'a Mutex<HashMap<ProductKey, Inflight>>, key: &ProductKey) -> Self {
        let mut map = table.lock().unwrap_or_else(|e| e.into_inner());
        let entry = map.entry(key.clone()).or_default();
        entry.holders += 1;
        Self {
            table,
            key: key.clone(),
            gate: entry.gate.clone(),
        }
    }
}

impl Drop for InflightGuard<'_> {
    fn drop(&mut self) {
        let mut map = self.table.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(entry) = map.get_mut(&self.key) {
            entry.holders = entry.holders.saturating_sub(1);
            if entry.holders == 0 {
                map.remove(&self.key);
            }
        }
    }
}
