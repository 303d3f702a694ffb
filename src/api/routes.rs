//! API Routes
//!
//! Configures the Axum router with all catalog endpoints.

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    get_product, health_handler, index_products, list_products, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// `/products/index` is a side-effecting GET kept for client compatibility.
/// It takes precedence over `/products/:id`.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/products", get(list_products))
        .route("/products/index", get(index_products))
        .route("/products/:id", get(get_product))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::util::ServiceExt;

    use crate::config::Config;
    use crate::search::InMemorySearchIndex;
    use crate::store::InMemoryCatalogStore;

    fn create_test_app() -> Router {
        let state = AppState::new(
            Arc::new(InMemoryCatalogStore::new()),
            Arc::new(InMemorySearchIndex::new()),
            &Config::default(),
        );
        create_router(state)
    }

    async fn get_status(uri: &str) -> StatusCode {
        create_test_app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        assert_eq!(get_status("/health").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_stats_endpoint() {
        assert_eq!(get_status("/stats").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_products_endpoint() {
        assert_eq!(get_status("/products?limit=5").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_index_route_wins_over_id_route() {
        assert_eq!(get_status("/products/index").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_product_not_found() {
        assert_eq!(get_status("/products/7").await, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_malformed_product_id() {
        assert_eq!(get_status("/products/seven").await, StatusCode::BAD_REQUEST);
    }
}
