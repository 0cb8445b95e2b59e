use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pricing_core::ProductKey;
use pricing_infra::pricing_service::PriceSheet;
use pricing_prices::{ArticleMetadata, ResolvedPrice};

// -------------------------
// Request DTOs
// -------------------------

/// Pagination parameters. Echoed back in `meta`; the timeline is not sliced.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PriceQuery {
    #[serde(default = "default_page")]
    pub page: i32,
    #[serde(default = "default_size")]
    pub size: i32,
}

fn default_page() -> i32 {
    1
}

fn default_size() -> i32 {
    3
}

impl Default for PriceQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            size: default_size(),
        }
    }
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    pub page: i32,
    pub size: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct PriceEnvelope {
    pub generated_date: DateTime<Utc>,
    pub article: String,
    pub store: String,
    pub meta: PageMeta,
    pub properties: ArticleMetadata,
    pub prices: Vec<ResolvedPrice>,
}

pub fn price_envelope(
    key: &ProductKey,
    query: PriceQuery,
    sheet: PriceSheet,
    generated_at: DateTime<Utc>,
) -> PriceEnvelope {
    PriceEnvelope {
        generated_date: generated_at,
        article: key.article_id.to_string(),
        store: key.store_id.to_string(),
        meta: PageMeta {
            page: query.page,
            size: query.size,
        },
        properties: sheet.metadata,
        prices: sheet.prices,
    }
}
