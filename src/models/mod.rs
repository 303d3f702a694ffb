//! Domain models and DTOs for the catalog service
//!
//! Catalog rows, the listing filter, the paginated result envelope and the
//! request/response bodies of the HTTP facade.

pub mod envelope;
pub mod filter;
pub mod product;
pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use envelope::{CatalogItem, ResultEnvelope};
pub use filter::{FilterRequest, DEFAULT_LIMIT};
pub use product::{Category, NewProduct, Product, ProductDocument};
pub use requests::ListProductsQuery;
pub use responses::{ErrorResponse, HealthResponse, IndexResponse, StatsResponse};
