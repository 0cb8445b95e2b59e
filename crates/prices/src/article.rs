use serde::{Deserialize, Serialize};

use crate::price::PriceRecord;

/// Descriptive properties of an article (opaque to price resolution).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleMetadata {
    pub uom: Option<String>,
    pub description: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
}

/// What a record store returns for one product: its metadata plus the raw
/// price records in storage order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleWithPrices {
    pub metadata: ArticleMetadata,
    pub records: Vec<PriceRecord>,
}
