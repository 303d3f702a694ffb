//! Search Index
//!
//! Full-text index of denormalized product documents, consulted only when a
//! listing request carries a search term.

mod meili;
mod memory;

use async_trait::async_trait;

use crate::error::SearchResult;
use crate::models::ProductDocument;

pub use meili::MeiliSearchIndex;
pub use memory::InMemorySearchIndex;

// == Search Hits ==
/// One page of ranked hits.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHits {
    pub hits: Vec<ProductDocument>,
    /// Approximate number of matches across all pages
    pub estimated_total: u64,
}

// == Search Index ==
#[async_trait]
pub trait SearchIndex: Send + Sync {
    /// Runs `query` with no structured filtering, returning up to `limit`
    /// hits starting at `offset`.
    async fn search(&self, query: &str, limit: u32, offset: u32) -> SearchResult<SearchHits>;

    /// Adds or replaces documents by id.
    async fn upsert_documents(&self, documents: &[ProductDocument]) -> SearchResult<()>;
}
