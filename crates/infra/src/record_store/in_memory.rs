use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;

use serde::Deserialize;

use pricing_core::{ArticleId, ProductKey, StoreId};
use pricing_prices::{ArticleMetadata, ArticleWithPrices, PriceRecord};

use super::r#trait::{RecordStore, StoreError};

/// One article in a seed file.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedArticle {
    pub store: StoreId,
    pub article: ArticleId,
    #[serde(default)]
    pub properties: ArticleMetadata,
    #[serde(default)]
    pub prices: Vec<PriceRecord>,
}

/// JSON seed format for the in-memory store (dev/demo data).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedFile {
    pub articles: Vec<SeedArticle>,
}

/// In-memory record store.
///
/// Intended for tests/dev. Records keep insertion order.
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    articles: RwLock<HashMap<ProductKey, ArticleWithPrices>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from parsed seed data.
    pub fn from_seed(seed: SeedFile) -> Self {
        let store = Self::new();
        for article in seed.articles {
            store.upsert(
                ProductKey::new(article.store, article.article),
                ArticleWithPrices {
                    metadata: article.properties,
                    records: article.prices,
                },
            );
        }
        store
    }

    /// Read and parse a JSON seed file.
    ///
    /// Price rows go through `PriceRecord` validation, so a seed with an
    /// inverted interval is rejected as a whole.
    pub fn load_seed_file(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| StoreError::Seed(format!("failed to read {}: {e}", path.display())))?;
        let seed: SeedFile = serde_json::from_str(&raw)
            .map_err(|e| StoreError::Seed(format!("failed to parse {}: {e}", path.display())))?;

        tracing::info!(
            path = %path.display(),
            articles = seed.articles.len(),
            "loaded price seed"
        );
        Ok(Self::from_seed(seed))
    }

    /// Insert or replace an article with its full price list.
    pub fn upsert(&self, key: ProductKey, article: ArticleWithPrices) {
        if let Ok(mut map) = self.articles.write() {
            map.insert(key, article);
        }
    }
}

#[async_trait::async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn find_article_prices(
        &self,
        key: &ProductKey,
    ) -> Result<Option<ArticleWithPrices>, StoreError> {
        let map = self
            .articles
            .read()
            .map_err(|_| StoreError::Database("in-memory store lock poisoned".to_string()))?;
        Ok(map.get(key).cloned())
    }
}
