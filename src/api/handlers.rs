//! API Handlers
//!
//! HTTP request handlers for each catalog endpoint.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    response::IntoResponse,
    Json,
};
use tracing::info;

use crate::cache::MemoryCache;
use crate::catalog::{CatalogIndexer, CatalogResolver};
use crate::config::Config;
use crate::error::{CatalogError, Result};
use crate::models::{HealthResponse, IndexResponse, ListProductsQuery, Product, StatsResponse};
use crate::search::SearchIndex;
use crate::store::CatalogStore;

/// Response header naming the source that produced a listing.
pub const SOURCE_HEADER: &str = "x-catalog-source";

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogResolver>,
    pub indexer: Arc<CatalogIndexer>,
    /// Handle to the response cache, kept for stats and the sweep task
    pub cache: MemoryCache,
    pub max_page_size: u32,
}

impl AppState {
    /// Wires the resolver and indexer over the given store and index, with a
    /// fresh in-process response cache sized from `config`.
    pub fn new(
        store: Arc<dyn CatalogStore>,
        index: Arc<dyn SearchIndex>,
        config: &Config,
    ) -> Self {
        let cache = MemoryCache::with_limits(config.cache_max_entries, config.cache_max_value_size);
        let catalog = CatalogResolver::new(
            store.clone(),
            index.clone(),
            Arc::new(cache.clone()),
            config.cache_ttl(),
        );

        Self {
            catalog: Arc::new(catalog),
            indexer: Arc::new(CatalogIndexer::new(store, index)),
            cache,
            max_page_size: config.max_page_size,
        }
    }
}

/// Handler for GET /products
///
/// Lists products by structured filters, or by full-text search when a
/// search term is given.
pub async fn list_products(
    State(state): State<AppState>,
    query: std::result::Result<Query<ListProductsQuery>, QueryRejection>,
) -> Result<impl IntoResponse> {
    let Query(query) =
        query.map_err(|rejection| CatalogError::Validation(rejection.body_text()))?;

    if let Some(error_msg) = query.validate(state.max_page_size) {
        return Err(CatalogError::Validation(error_msg));
    }

    let resolution = state.catalog.resolve(&query.into_filter()).await?;
    let source = resolution.source();

    Ok(([(SOURCE_HEADER, source)], Json(resolution.into_envelope())))
}

/// Handler for GET /products/index
///
/// Copies the whole catalog into the search index.
pub async fn index_products(State(state): State<AppState>) -> Result<Json<IndexResponse>> {
    let indexed = state.indexer.resync().await?;
    info!("Search index resync finished: {} documents", indexed);

    Ok(Json(IndexResponse::new(indexed)))
}

/// Handler for GET /products/:id
pub async fn get_product(
    State(state): State<AppState>,
    id: std::result::Result<Path<i32>, PathRejection>,
) -> Result<Json<Product>> {
    let Path(id) = id.map_err(|rejection| CatalogError::Validation(rejection.body_text()))?;

    state
        .catalog
        .find_product(id)
        .await?
        .map(Json)
        .ok_or_else(|| CatalogError::NotFound(format!("product {}", id)))
}

/// Handler for GET /stats
///
/// Returns response cache statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(state.cache.stats().await.into())
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use rust_decimal::Decimal;

    use crate::models::NewProduct;
    use crate::search::InMemorySearchIndex;
    use crate::store::InMemoryCatalogStore;

    async fn test_state() -> (AppState, Arc<InMemoryCatalogStore>) {
        let store = Arc::new(InMemoryCatalogStore::new());
        store
            .insert_product(NewProduct::new("SKU000001", "Kettle", Decimal::from(35)))
            .await
            .unwrap();
        let state = AppState::new(
            store.clone(),
            Arc::new(InMemorySearchIndex::new()),
            &Config::default(),
        );
        (state, store)
    }

    #[tokio::test]
    async fn test_list_products_handler() {
        let (state, _) = test_state().await;

        let response = list_products(State(state), Ok(Query(ListProductsQuery::default())))
            .await
            .unwrap()
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[SOURCE_HEADER], "store");
    }

    #[tokio::test]
    async fn test_list_products_rejects_oversized_limit() {
        let (state, store) = test_state().await;
        let query = ListProductsQuery {
            limit: Some(i64::from(state.max_page_size) + 1),
            ..Default::default()
        };

        let result = list_products(State(state), Ok(Query(query))).await;
        assert!(matches!(result, Err(CatalogError::Validation(_))));
        assert_eq!(store.query_count(), 0);
    }

    #[tokio::test]
    async fn test_get_product_handler() {
        let (state, _) = test_state().await;

        let product = get_product(State(state), Ok(Path(1))).await.unwrap();
        assert_eq!(product.sku, "SKU000001");
    }

    #[tokio::test]
    async fn test_get_missing_product() {
        let (state, _) = test_state().await;

        let result = get_product(State(state), Ok(Path(42))).await;
        assert!(matches!(result, Err(CatalogError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_index_products_handler() {
        let (state, _) = test_state().await;

        let response = index_products(State(state)).await.unwrap();
        assert_eq!(response.indexed, 1);
        assert_eq!(response.message, "Indexing complete");
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let (state, _) = test_state().await;

        let response = stats_handler(State(state)).await;
        assert_eq!(response.hits, 0);
        assert_eq!(response.misses, 0);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }
}
