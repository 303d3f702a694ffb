//! Search index resync
//!
//! Copies every catalog product into the search index as a denormalized
//! document. Upserts are keyed by product id, so repeated runs converge on
//! the same index contents.

use std::sync::Arc;

use tracing::info;

use crate::error::Result;
use crate::models::ProductDocument;
use crate::search::SearchIndex;
use crate::store::CatalogStore;

// == Catalog Indexer ==
pub struct CatalogIndexer {
    store: Arc<dyn CatalogStore>,
    index: Arc<dyn SearchIndex>,
}

impl CatalogIndexer {
    pub fn new(store: Arc<dyn CatalogStore>, index: Arc<dyn SearchIndex>) -> Self {
        Self { store, index }
    }

    /// Pushes all products to the index and returns how many were submitted.
    ///
    /// Store failures surface as `CatalogError::Store`, index failures as
    /// `CatalogError::Search`. Products deleted from the store are not
    /// removed from the index.
    pub async fn resync(&self) -> Result<usize> {
        let products = self.store.all_products().await?;
        let documents: Vec<ProductDocument> = products.iter().map(ProductDocument::from).collect();

        self.index.upsert_documents(&documents).await?;

        info!("Indexed {} products", documents.len());
        Ok(documents.len())
    }
}
