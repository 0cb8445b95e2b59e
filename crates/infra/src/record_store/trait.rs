use std::sync::Arc;

use thiserror::Error;

use pricing_core::ProductKey;
use pricing_prices::ArticleWithPrices;

/// Record store operation error.
///
/// These are **infrastructure errors** (storage, malformed rows) as opposed to
/// domain errors. An unknown product is not an error: lookups return `None`.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(String),

    /// A stored row could not be turned into a valid `PriceRecord`.
    #[error("invalid price record: {0}")]
    InvalidRecord(String),

    #[error("seed data error: {0}")]
    Seed(String),
}

/// Read-only source of price records for one product at a time.
///
/// Implementations must return records in a stable order (the resolver's
/// output order depends on it).
#[async_trait::async_trait]
pub trait RecordStore: Send + Sync {
    /// Load metadata and price records for `key`.
    ///
    /// Returns `Ok(None)` when the article is unknown for that store. A known
    /// article with no prices yields `Some` with an empty record list.
    async fn find_article_prices(
        &self,
        key: &ProductKey,
    ) -> Result<Option<ArticleWithPrices>, StoreError>;
}

#[async_trait::async_trait]
impl<S> RecordStore for Arc<S>
where
    S: RecordStore + ?Sized,
{
    async fn find_article_prices(
        &self,
        key: &ProductKey,
    ) -> Result<Option<ArticleWithPrices>, StoreError> {
        (**self).find_article_prices(key).await
    }
}
