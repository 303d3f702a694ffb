//! Paginated result envelope

use serde::{Deserialize, Serialize};

use crate::models::{FilterRequest, Product, ProductDocument};

// == Catalog Item ==
/// One entry of a listing page.
///
/// Store listings carry full products with their category; search listings
/// carry the lighter index documents. Serialized without a tag so the wire
/// shape is the bare product or document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CatalogItem {
    Product(Product),
    Hit(ProductDocument),
}

// == Result Envelope ==
/// Listing response: one page of items plus the full match count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultEnvelope {
    pub items: Vec<CatalogItem>,
    /// Total matches ignoring pagination. Approximate for search results.
    pub total: u64,
    pub limit: u32,
    pub offset: u32,
}

impl ResultEnvelope {
    /// Creates an envelope echoing the request's pagination.
    pub fn new(items: Vec<CatalogItem>, total: u64, request: &FilterRequest) -> Self {
        Self {
            items,
            total,
            limit: request.limit,
            offset: request.offset,
        }
    }

    /// Envelope of store products.
    pub fn from_products(products: Vec<Product>, total: u64, request: &FilterRequest) -> Self {
        let items = products.into_iter().map(CatalogItem::Product).collect();
        Self::new(items, total, request)
    }

    /// Envelope of search hits.
    pub fn from_hits(hits: Vec<ProductDocument>, total: u64, request: &FilterRequest) -> Self {
        let items = hits.into_iter().map(CatalogItem::Hit).collect();
        Self::new(items, total, request)
    }
}
