//! Prices domain module.
//!
//! This crate contains the price record model and the interval overlap
//! resolver, implemented purely as deterministic domain logic (no IO, no HTTP,
//! no storage).

pub mod article;
pub mod overlap;
pub mod price;
pub mod resolver;

pub use article::{ArticleMetadata, ArticleWithPrices};
pub use overlap::overlaps;
pub use price::{PriceRecord, ResolvedPrice};
pub use resolver::{anchored_groups, resolve, resolve_with, OverlapGroup, ResolutionPolicy};
