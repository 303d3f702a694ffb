//! Listing filter
//!
//! `FilterRequest` is the normalized set of listing parameters. A digest of
//! its canonical serialization is the response cache key.

use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::json;
use sha2::{Digest, Sha256};

/// Page size used when the caller does not supply one.
pub const DEFAULT_LIMIT: u32 = 20;

/// Prefix of every listing cache key.
pub const CACHE_KEY_PREFIX: &str = "products";

// == Filter Request ==
/// Normalized listing parameters.
///
/// Price bounds are inclusive. Category and price predicates are ignored
/// whenever a search term is present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterRequest {
    pub category: Option<i32>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub search: Option<String>,
    pub limit: u32,
    pub offset: u32,
}

impl Default for FilterRequest {
    fn default() -> Self {
        Self {
            category: None,
            min_price: None,
            max_price: None,
            search: None,
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl FilterRequest {
    // == Builders ==
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, category: i32) -> Self {
        self.category = Some(category);
        self
    }

    pub fn min_price(mut self, min_price: Decimal) -> Self {
        self.min_price = Some(min_price);
        self
    }

    pub fn max_price(mut self, max_price: Decimal) -> Self {
        self.max_price = Some(max_price);
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn page(mut self, limit: u32, offset: u32) -> Self {
        self.limit = limit;
        self.offset = offset;
        self
    }

    // == Normalize ==
    /// Trims the search term (dropping it when blank) and strips trailing
    /// zeros from price bounds so equivalent requests compare equal.
    pub fn normalized(mut self) -> Self {
        self.search = self
            .search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        self.min_price = self.min_price.map(|p| p.normalize());
        self.max_price = self.max_price.map(|p| p.normalize());
        self
    }

    /// Returns the search term when present and non-blank.
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Returns the same request with the search term cleared.
    pub fn without_search(&self) -> Self {
        Self {
            search: None,
            ..self.clone()
        }
    }

    // == Cache Key ==
    /// Canonical JSON of the normalized request, every field included.
    ///
    /// Fields are emitted in sorted key order, so two requests that normalize
    /// to the same value always serialize identically.
    pub fn canonical_json(&self) -> String {
        let normalized = self.clone().normalized();
        json!({
            "category": normalized.category,
            "limit": normalized.limit,
            "maxPrice": normalized.max_price,
            "minPrice": normalized.min_price,
            "offset": normalized.offset,
            "search": normalized.search,
        })
        .to_string()
    }

    /// Fixed-length cache key: the prefix plus the SHA-256 of
    /// `canonical_json`, whatever the length of the search term.
    pub fn cache_key(&self) -> String {
        let digest = Sha256::digest(self.canonical_json().as_bytes());
        format!("{}:{}", CACHE_KEY_PREFIX, hex::encode(digest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_defaults() {
        let req = FilterRequest::new();
        assert_eq!(req.limit, 20);
        assert_eq!(req.offset, 0);
        assert!(req.search_term().is_none());
    }

    #[test]
    fn test_canonical_json_includes_defaults() {
        assert_eq!(
            FilterRequest::new().canonical_json(),
            r#"{"category":null,"limit":20,"maxPrice":null,"minPrice":null,"offset":0,"search":null}"#
        );
    }

    #[test]
    fn test_cache_key_is_prefixed_digest() {
        let key = FilterRequest::new().cache_key();
        let digest = key.strip_prefix("products:").unwrap();

        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_cache_key_length_is_independent_of_search_term() {
        let short = FilterRequest::new().search("a").cache_key();
        let long = FilterRequest::new().search("a".repeat(1100)).cache_key();

        assert_eq!(short.len(), long.len());
        assert!(long.len() <= crate::cache::MAX_KEY_LENGTH);
        assert_ne!(short, long);
    }

    #[test]
    fn test_cache_key_is_stable_for_equivalent_requests() {
        let a = FilterRequest::new().min_price(dec("100")).search("  phone ");
        let b = FilterRequest::new().min_price(dec("100.00")).search("phone");
        assert_eq!(a.cache_key(), b.cache_key());
    }

    #[test]
    fn test_cache_key_differs_by_page() {
        let a = FilterRequest::new().page(10, 0);
        let b = FilterRequest::new().page(10, 10);
        assert_ne!(a.cache_key(), b.cache_key());
    }

    #[test]
    fn test_blank_search_is_absent() {
        let req = FilterRequest::new().search("   ");
        assert!(req.search_term().is_none());
        assert!(req.normalized().search.is_none());
    }

    #[test]
    fn test_without_search_keeps_other_fields() {
        let req = FilterRequest::new()
            .category(2)
            .max_price(dec("500"))
            .search("phone")
            .page(5, 15);
        let cleared = req.without_search();

        assert!(cleared.search.is_none());
        assert_eq!(cleared.category, Some(2));
        assert_eq!(cleared.max_price, Some(dec("500")));
        assert_eq!((cleared.limit, cleared.offset), (5, 15));
    }
}
