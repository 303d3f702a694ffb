//! API Module
//!
//! HTTP handlers and routing for the catalog REST API.
//!
//! # Endpoints
//! - `GET /products` - Filtered or searched product listing
//! - `GET /products/index` - Resync the search index from the store
//! - `GET /products/:id` - Single product with its category
//! - `GET /stats` - Response cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
