//! Postgres-backed record store.
//!
//! Reads the `articles` and `prices` tables (see `migrations/0001_pricing.sql`).
//! Price rows are returned in primary-key order, which is the stable storage
//! order the resolver relies on.
//!
//! ## Error Mapping
//!
//! | Failure | StoreError |
//! |---------|------------|
//! | Any SQLx error (connection, query, decode) | `Database` |
//! | Row decodes but `valid_from > valid_to` | `InvalidRecord` |

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Row};
use tracing::instrument;

use pricing_core::ProductKey;
use pricing_prices::{ArticleMetadata, ArticleWithPrices, PriceRecord};

use super::r#trait::{RecordStore, StoreError};

/// Postgres-backed read-only record store.
///
/// Uses the SQLx connection pool, which is thread-safe (Arc + Send + Sync).
#[derive(Debug, Clone)]
pub struct PostgresRecordStore {
    pool: Arc<PgPool>,
}

impl PostgresRecordStore {
    /// Create a new PostgresRecordStore with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    async fn find_metadata(&self, key: &ProductKey) -> Result<Option<ArticleMetadata>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT uom, description, brand, model
            FROM articles
            WHERE store_id = $1 AND article_id = $2
            "#,
        )
        .bind(key.store_id.as_str())
        .bind(key.article_id.as_str())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_metadata", e))?;

        row.map(|row| {
            Ok(ArticleMetadata {
                uom: row.try_get("uom").map_err(|e| map_sqlx_error("decode_article", e))?,
                description: row
                    .try_get("description")
                    .map_err(|e| map_sqlx_error("decode_article", e))?,
                brand: row.try_get("brand").map_err(|e| map_sqlx_error("decode_article", e))?,
                model: row.try_get("model").map_err(|e| map_sqlx_error("decode_article", e))?,
            })
        })
        .transpose()
    }

    async fn find_records(&self, key: &ProductKey) -> Result<Vec<PriceRecord>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, type, subtype, currency, amount, valid_from, valid_to
            FROM prices
            WHERE store_id = $1 AND article_id = $2
            ORDER BY id ASC
            "#,
        )
        .bind(key.store_id.as_str())
        .bind(key.article_id.as_str())
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_records", e))?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            let id: i64 = row.try_get("id").map_err(|e| map_sqlx_error("decode_price", e))?;
            let price_type: String =
                row.try_get("type").map_err(|e| map_sqlx_error("decode_price", e))?;
            let subtype: String =
                row.try_get("subtype").map_err(|e| map_sqlx_error("decode_price", e))?;
            let currency: String =
                row.try_get("currency").map_err(|e| map_sqlx_error("decode_price", e))?;
            let amount: Decimal =
                row.try_get("amount").map_err(|e| map_sqlx_error("decode_price", e))?;
            let valid_from: DateTime<Utc> =
                row.try_get("valid_from").map_err(|e| map_sqlx_error("decode_price", e))?;
            let valid_to: DateTime<Utc> =
                row.try_get("valid_to").map_err(|e| map_sqlx_error("decode_price", e))?;

            let record = PriceRecord::new(
                price_type,
                subtype,
                currency,
                amount,
                valid_from.fixed_offset(),
                valid_to.fixed_offset(),
            )
            .map_err(|e| StoreError::InvalidRecord(format!("price row {id}: {e}")))?;
            records.push(record);
        }

        Ok(records)
    }
}

#[async_trait::async_trait]
impl RecordStore for PostgresRecordStore {
    #[instrument(
        skip(self),
        fields(store_id = %key.store_id, article_id = %key.article_id),
        err
    )]
    async fn find_article_prices(
        &self,
        key: &ProductKey,
    ) -> Result<Option<ArticleWithPrices>, StoreError> {
        let Some(metadata) = self.find_metadata(key).await? else {
            return Ok(None);
        };

        let records = self.find_records(key).await?;
        tracing::debug!(records = records.len(), "loaded price records");

        Ok(Some(ArticleWithPrices { metadata, records }))
    }
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => StoreError::Database(format!(
            "database error in {}: {}",
            operation,
            db_err.message()
        )),
        sqlx::Error::PoolClosed => {
            StoreError::Database(format!("connection pool closed in {}", operation))
        }
        _ => StoreError::Database(format!("sqlx error in {}: {}", operation, err)),
    }
}
