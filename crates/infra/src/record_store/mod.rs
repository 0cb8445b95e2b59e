//! Record store boundary.
//!
//! A record store answers one question: for a `(store, article)` key, what is
//! the article's metadata and its raw price records, in stable storage order?
//! The resolver never talks to storage; the pricing service feeds it from here.

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::{InMemoryRecordStore, SeedArticle, SeedFile};
pub use postgres::PostgresRecordStore;
pub use r#trait::{RecordStore, StoreError};
