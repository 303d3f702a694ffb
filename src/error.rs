//! Error types for the catalog service
//!
//! Provides unified error handling using thiserror. Only `CatalogError`
//! reaches the HTTP layer; the collaborator errors are either converted into
//! it or absorbed where degraded behavior is acceptable.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Catalog Error Enum ==
/// Request-level error type for the catalog service.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Malformed or out-of-range query parameters
    #[error("Invalid request: {0}")]
    Validation(String),

    /// Requested resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Catalog store failed; fatal for the current request
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Search index failed during an explicit index operation
    #[error(transparent)]
    Search(#[from] SearchError),
}

// == Store Error Enum ==
/// Failures raised by a catalog store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Underlying database failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Uniqueness or check constraint rejected a write
    #[error("Constraint violation: {0}")]
    Constraint(String),

    /// Store cannot be reached
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

// == Search Error Enum ==
/// Failures raised by a search index.
#[derive(Error, Debug)]
pub enum SearchError {
    /// Transport failure or timeout
    #[error("Search index unreachable: {0}")]
    Unreachable(String),

    /// Index answered with a non-success status
    #[error("Search index returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Index answered with a body that could not be decoded
    #[error("Malformed search response: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for SearchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            SearchError::Malformed(err.to_string())
        } else {
            SearchError::Unreachable(err.to_string())
        }
    }
}

// == Cache Error Enum ==
/// Failures raised by a response cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key longer than the cache accepts
    #[error("Key exceeds maximum length of {0} bytes")]
    KeyTooLong(usize),

    /// Value larger than the cache accepts
    #[error("Value exceeds maximum size of {0} bytes")]
    ValueTooLarge(usize),

    /// Cache is full and eviction failed
    #[error("Cache full")]
    Full,

    /// Cache backend cannot be reached
    #[error("Cache unavailable: {0}")]
    Unavailable(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let status = match &self {
            CatalogError::Validation(_) => StatusCode::BAD_REQUEST,
            CatalogError::NotFound(_) => StatusCode::NOT_FOUND,
            CatalogError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CatalogError::Search(_) => StatusCode::SERVICE_UNAVAILABLE,
        };

        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Aliases ==
/// Convenience Result type for request handling.
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Result type for catalog store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Result type for search index operations.
pub type SearchResult<T> = std::result::Result<T, SearchError>;

/// Result type for response cache operations.
pub type CacheResult<T> = std::result::Result<T, CacheError>;
