//! Catalog Query Layer
//!
//! Resolves listing requests across the response cache, the search index and
//! the catalog store, and keeps the search index in step with the store.

mod indexer;
mod resolver;


pub use indexer::CatalogIndexer;
pub use resolver::{CatalogResolver, Resolution, SearchOutcome};
