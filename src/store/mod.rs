//! Catalog Store
//!
//! System of record for products and categories. The resolver and indexer
//! depend on the `CatalogStore` trait; `PgCatalogStore` is the production
//! implementation and `InMemoryCatalogStore` a substitutable in-process one.

mod memory;
mod postgres;

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::models::{FilterRequest, Product};

pub use memory::InMemoryCatalogStore;
pub use postgres::PgCatalogStore;

// == Catalog Store ==
/// Read access to the product catalog.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Returns one page of products matching the structured predicates of
    /// `request`, with their categories, plus the total match count.
    ///
    /// Supplied predicates (category, inclusive price bounds) are combined
    /// conjunctively; absent ones are omitted. The search term is ignored.
    /// The total ignores `limit` and `offset`.
    async fn find_products(&self, request: &FilterRequest) -> StoreResult<(Vec<Product>, u64)>;

    /// Returns a single product with its category.
    async fn find_product(&self, id: i32) -> StoreResult<Option<Product>>;

    /// Returns every product with its category, ordered by id.
    async fn all_products(&self) -> StoreResult<Vec<Product>>;
}
