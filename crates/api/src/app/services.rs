use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

use pricing_core::ProductKey;
use pricing_infra::{
    cache::{InMemoryResultCache, ResultCache},
    config::{RecordSource, ServiceConfig},
    pricing_service::{PriceLookup, PricingService, ServiceError},
    record_store::{InMemoryRecordStore, PostgresRecordStore},
};
use pricing_prices::ResolutionPolicy;

/// Type-erased result cache (in-memory or Redis, picked at startup).
pub type SharedCache = Arc<dyn ResultCache>;

type InMemoryPricing = PricingService<Arc<InMemoryRecordStore>, SharedCache>;
type PersistentPricing = PricingService<Arc<PostgresRecordStore>, SharedCache>;

#[derive(Clone)]
pub enum AppServices {
    InMemory {
        pricing: Arc<InMemoryPricing>,
    },
    Persistent {
        pricing: Arc<PersistentPricing>,
    },
}

impl AppServices {
    /// In-memory wiring around an existing store (dev/test).
    pub fn in_memory(
        store: Arc<InMemoryRecordStore>,
        cache: SharedCache,
        policy: ResolutionPolicy,
    ) -> Self {
        let pricing = Arc::new(PricingService::new(store, cache, policy));
        AppServices::InMemory { pricing }
    }

    pub fn persistent(store: PostgresRecordStore, cache: SharedCache, policy: ResolutionPolicy) -> Self {
        let pricing = Arc::new(PricingService::new(Arc::new(store), cache, policy));
        AppServices::Persistent { pricing }
    }

    pub async fn get_prices(&self, key: &ProductKey) -> Result<PriceLookup, ServiceError> {
        match self {
            AppServices::InMemory { pricing } => pricing.get_prices(key).await,
            AppServices::Persistent { pricing } => pricing.get_prices(key).await,
        }
    }

    pub fn policy(&self) -> ResolutionPolicy {
        match self {
            AppServices::InMemory { pricing } => pricing.policy(),
            AppServices::Persistent { pricing } => pricing.policy(),
        }
    }

    pub fn backend(&self) -> &'static str {
        match self {
            AppServices::InMemory { .. } => "in_memory",
            AppServices::Persistent { .. } => "postgres",
        }
    }
}

pub async fn build_services(config: &ServiceConfig) -> anyhow::Result<AppServices> {
    let cache = build_cache(config).await?;

    match &config.records {
        RecordSource::Postgres { database_url } => {
            let pool = PgPoolOptions::new()
                .max_connections(10)
                .connect(database_url)
                .await
                .context("failed to connect to Postgres")?;
            tracing::info!("using Postgres record store");
            Ok(AppServices::persistent(
                PostgresRecordStore::new(pool),
                cache,
                config.policy,
            ))
        }
        RecordSource::InMemory { seed_file } => {
            let store = match seed_file {
                Some(path) => InMemoryRecordStore::load_seed_file(path)?,
                None => {
                    tracing::warn!("PRICING_SEED_FILE not set; in-memory record store starts empty");
                    InMemoryRecordStore::new()
                }
            };
            Ok(AppServices::in_memory(Arc::new(store), cache, config.policy))
        }
    }
}

async fn build_cache(config: &ServiceConfig) -> anyhow::Result<SharedCache> {
    let Some(url) = config.redis_url.as_deref() else {
        return Ok(Arc::new(InMemoryResultCache::new()));
    };

    #[cfg(feature = "redis")]
    {
        let cache = pricing_infra::cache::RedisResultCache::connect(url, config.cache_ttl)
            .await
            .context("failed to connect to Redis")?;
        tracing::info!(ttl_secs = config.cache_ttl.as_secs(), "using Redis result cache");
        Ok(Arc::new(cache))
    }
    #[cfg(not(feature = "redis"))]
    {
        let _ = url;
        tracing::warn!("REDIS_URL set but redis feature not enabled, falling back to in-memory cache");
        Ok(Arc::new(InMemoryResultCache::new()))
    }
}
