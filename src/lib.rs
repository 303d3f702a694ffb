//! Product Catalog - a catalog backend with filtered listing, full-text
//! search and a TTL response cache
//!
//! Listing requests resolve through the response cache first, then either
//! the search index (when a search term is present) or the catalog store.
//! A failing search index degrades to the store with the term cleared.

pub mod api;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod search;
pub mod store;
pub mod tasks;

pub use api::{create_router, AppState};
pub use catalog::{CatalogIndexer, CatalogResolver, Resolution};
pub use config::Config;
pub use error::{CatalogError, Result};
pub use tasks::spawn_cleanup_task;
