//! Request DTOs for the catalog API
//!
//! Defines the structure of incoming query strings.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::models::{FilterRequest, DEFAULT_LIMIT};

/// Query parameters of `GET /products`
///
/// `limit` and `offset` are read as signed integers so negative values can
/// be rejected with a validation message instead of a parse failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListProductsQuery {
    /// Category id to match exactly
    pub category: Option<i32>,
    /// Inclusive lower price bound
    pub min_price: Option<Decimal>,
    /// Inclusive upper price bound
    pub max_price: Option<Decimal>,
    /// Page size (default 20)
    pub limit: Option<i64>,
    /// Rows to skip (default 0)
    pub offset: Option<i64>,
    /// Full-text search term
    pub search: Option<String>,
}

impl ListProductsQuery {
    /// Validates the query against the configured maximum page size.
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self, max_page_size: u32) -> Option<String> {
        if let Some(limit) = self.limit {
            if limit < 0 {
                return Some("limit must be a non-negative integer".to_string());
            }
            if limit > i64::from(max_page_size) {
                return Some(format!("limit must not exceed {}", max_page_size));
            }
        }
        if let Some(offset) = self.offset {
            if offset < 0 {
                return Some("offset must be a non-negative integer".to_string());
            }
            if offset > i64::from(u32::MAX) {
                return Some(format!("offset must not exceed {}", u32::MAX));
            }
        }
        None
    }

    /// Converts a validated query into a normalized `FilterRequest`.
    pub fn into_filter(self) -> FilterRequest {
        FilterRequest {
            category: self.category,
            min_price: self.min_price,
            max_price: self.max_price,
            search: self.search,
            limit: self
                .limit
                .and_then(|v| u32::try_from(v).ok())
                .unwrap_or(DEFAULT_LIMIT),
            offset: self
                .offset
                .and_then(|v| u32::try_from(v).ok())
                .unwrap_or(0),
        }
        .normalized()
    }
}
