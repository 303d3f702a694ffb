//! Catalog Resolver
//!
//! Turns a `FilterRequest` into a `ResultEnvelope`, choosing between the
//! response cache, the search index and the catalog store.
//!
//! # Resolution order
//! 1. Cache lookup under the request's canonical key
//! 2. On a miss: search path when a search term is present, filter path otherwise
//! 3. Search failure degrades to the filter path with the term cleared
//! 4. The computed envelope is cached for the TTL, best-effort
//!
//! Cached envelopes are never invalidated on catalog writes; they expire
//! passively. Concurrent identical misses may both compute and store the same
//! envelope.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::cache::ResponseCache;
use crate::error::{SearchError, StoreResult};
use crate::models::{FilterRequest, Product, ResultEnvelope};
use crate::search::SearchIndex;
use crate::store::CatalogStore;

// == Resolution ==
/// How a listing envelope was produced.
#[derive(Debug)]
pub enum Resolution {
    /// Served verbatim from the response cache
    Cached(ResultEnvelope),
    /// Computed from the catalog store
    Filtered(ResultEnvelope),
    /// Computed from the search index
    Searched(ResultEnvelope),
    /// Search index failed; computed from the store with the term cleared
    Degraded {
        envelope: ResultEnvelope,
        cause: SearchError,
    },
}

impl Resolution {
    pub fn envelope(&self) -> &ResultEnvelope {
        match self {
            Resolution::Cached(envelope)
            | Resolution::Filtered(envelope)
            | Resolution::Searched(envelope)
            | Resolution::Degraded { envelope, .. } => envelope,
        }
    }

    pub fn into_envelope(self) -> ResultEnvelope {
        match self {
            Resolution::Cached(envelope)
            | Resolution::Filtered(envelope)
            | Resolution::Searched(envelope)
            | Resolution::Degraded { envelope, .. } => envelope,
        }
    }

    /// Short label of the producing source, reported to HTTP clients.
    pub fn source(&self) -> &'static str {
        match self {
            Resolution::Cached(_) => "cache",
            Resolution::Filtered(_) => "store",
            Resolution::Searched(_) => "search",
            Resolution::Degraded { .. } => "fallback",
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Resolution::Degraded { .. })
    }
}

// == Search Outcome ==
/// Result of the search path. Index failure is a value, not an error: the
/// caller decides how to degrade.
#[derive(Debug)]
pub enum SearchOutcome {
    Hits(ResultEnvelope),
    Unavailable(SearchError),
}

// == Catalog Resolver ==
pub struct CatalogResolver {
    store: Arc<dyn CatalogStore>,
    index: Arc<dyn SearchIndex>,
    cache: Arc<dyn ResponseCache>,
    cache_ttl: Duration,
}

impl CatalogResolver {
    pub fn new(
        store: Arc<dyn CatalogStore>,
        index: Arc<dyn SearchIndex>,
        cache: Arc<dyn ResponseCache>,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            store,
            index,
            cache,
            cache_ttl,
        }
    }

    // == Resolve ==
    /// Resolves a listing request.
    ///
    /// Only store failures surface as errors. Cache failures count as misses
    /// or skipped writes, and search failures degrade to the filter path.
    pub async fn resolve(&self, request: &FilterRequest) -> StoreResult<Resolution> {
        let request = request.clone().normalized();
        let key = request.cache_key();

        if let Some(envelope) = self.read_cached::<ResultEnvelope>(&key).await {
            return Ok(Resolution::Cached(envelope));
        }

        let resolution = match request.search_term() {
            Some(term) => match self.search_path(term, &request).await {
                SearchOutcome::Hits(envelope) => Resolution::Searched(envelope),
                SearchOutcome::Unavailable(cause) => {
                    warn!(
                        "Search index unavailable, falling back to filter path: {}",
                        cause
                    );
                    let envelope = self.filter_path(&request.without_search()).await?;
                    Resolution::Degraded { envelope, cause }
                }
            },
            None => Resolution::Filtered(self.filter_path(&request).await?),
        };

        self.write_cached(&key, resolution.envelope()).await;
        Ok(resolution)
    }

    // == Search Path ==
    /// Queries the index for one page of hits. Structured filters are not
    /// applied; the total is the index's estimate.
    pub async fn search_path(&self, term: &str, request: &FilterRequest) -> SearchOutcome {
        match self.index.search(term, request.limit, request.offset).await {
            Ok(found) => SearchOutcome::Hits(ResultEnvelope::from_hits(
                found.hits,
                found.estimated_total,
                request,
            )),
            Err(err) => SearchOutcome::Unavailable(err),
        }
    }

    // == Filter Path ==
    /// Queries the store with the structured predicates of `request`.
    pub async fn filter_path(&self, request: &FilterRequest) -> StoreResult<ResultEnvelope> {
        let (products, total) = self.store.find_products(request).await?;
        Ok(ResultEnvelope::from_products(products, total, request))
    }

    // == Single Product ==
    /// Looks up one product, caching it under `product:{id}` when found.
    pub async fn find_product(&self, id: i32) -> StoreResult<Option<Product>> {
        let key = format!("product:{}", id);

        if let Some(product) = self.read_cached::<Product>(&key).await {
            return Ok(Some(product));
        }

        let product = self.store.find_product(id).await?;
        if let Some(product) = &product {
            self.write_cached(&key, product).await;
        }
        Ok(product)
    }

    // == Cache Helpers ==
    async fn read_cached<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let payload = match self.cache.get(key).await {
            Ok(Some(payload)) => payload,
            Ok(None) => {
                debug!("Cache miss for {}", key);
                return None;
            }
            Err(err) => {
                warn!("Cache read failed for {}, treating as miss: {}", key, err);
                return None;
            }
        };

        match serde_json::from_str(&payload) {
            Ok(value) => {
                debug!("Cache hit for {}", key);
                Some(value)
            }
            Err(err) => {
                warn!("Discarding undecodable cache entry {}: {}", key, err);
                None
            }
        }
    }

    async fn write_cached<T: Serialize>(&self, key: &str, value: &T) {
        let payload = match serde_json::to_string(value) {
            Ok(payload) => payload,
            Err(err) => {
                warn!("Could not serialize cache entry {}: {}", key, err);
                return;
            }
        };

        if let Err(err) = self.cache.set(key, payload, self.cache_ttl).await {
            warn!("Cache write failed for {}: {}", key, err);
        }
    }
}
