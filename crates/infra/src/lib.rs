//! Infrastructure layer: record stores, result caches, config and the
//! read-through pricing service that ties them to the resolver.

pub mod cache;
pub mod config;
pub mod pricing_service;
pub mod record_store;


pub use cache::{InMemoryResultCache, ResultCache};
pub use config::{ConfigError, RecordSource, ServiceConfig};
pub use pricing_service::{PriceLookup, PriceSheet, PricingService, ServiceError};
pub use record_store::{InMemoryRecordStore, PostgresRecordStore, RecordStore, StoreError};
