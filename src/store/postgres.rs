//! Postgres catalog store
//!
//! Builds listing queries dynamically with `sqlx::QueryBuilder` so only the
//! supplied predicates reach the SQL.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{FromRow, Postgres, QueryBuilder};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::StoreResult;
use crate::models::{Category, FilterRequest, Product};
use crate::store::CatalogStore;

const PRODUCT_COLUMNS: &str = "SELECT p.id, p.sku, p.name, p.description, p.price, \
     p.category_id, p.created_at, \
     c.id AS category_ref, c.name AS category_name, c.slug AS category_slug \
     FROM products p LEFT JOIN categories c ON c.id = p.category_id";

const SCHEMA: [&str; 4] = [
    r#"
    CREATE TABLE IF NOT EXISTS categories (
        id SERIAL PRIMARY KEY,
        name VARCHAR(255) NOT NULL,
        slug VARCHAR(255) NOT NULL UNIQUE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS products (
        id SERIAL PRIMARY KEY,
        sku VARCHAR(64) NOT NULL UNIQUE,
        name VARCHAR(255) NOT NULL,
        description TEXT NULL,
        price NUMERIC(10, 2) NOT NULL CHECK (price >= 0),
        category_id INTEGER NULL REFERENCES categories(id) ON DELETE SET NULL,
        created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_products_category_id ON products (category_id)",
    "CREATE INDEX IF NOT EXISTS idx_products_price ON products (price)",
];

// == Row Mapping ==
/// Flat row produced by the products/categories join.
#[derive(Debug, FromRow)]
struct ProductRow {
    id: i32,
    sku: String,
    name: String,
    description: Option<String>,
    price: Decimal,
    category_id: Option<i32>,
    created_at: NaiveDateTime,
    category_ref: Option<i32>,
    category_name: Option<String>,
    category_slug: Option<String>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        let category = match (row.category_ref, row.category_name, row.category_slug) {
            (Some(id), Some(name), Some(slug)) => Some(Category { id, name, slug }),
            _ => None,
        };

        Self {
            id: row.id,
            sku: row.sku,
            name: row.name,
            description: row.description,
            price: row.price,
            category_id: row.category_id,
            category,
            created_at: row.created_at,
        }
    }
}

// == Postgres Catalog Store ==
/// Catalog store over a Postgres connection pool.
#[derive(Debug, Clone)]
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    /// Wraps an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a pool from configuration.
    ///
    /// Connections are established lazily, so an unreachable database
    /// surfaces as a per-request store error instead of a startup failure.
    /// Use `bootstrap_schema` rather than `ensure_schema` at startup to keep
    /// that property.
    pub fn connect_lazy(config: &Config) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .connect_lazy(&config.database_url)?;
        Ok(Self::new(pool))
    }

    /// Creates the catalog tables and indexes when they do not exist yet.
    pub async fn ensure_schema(&self) -> StoreResult<()> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        info!("Catalog schema verified");
        Ok(())
    }

    /// Runs `ensure_schema`, logging a failure instead of returning it.
    ///
    /// Returns whether the schema is known to be in place.
    pub async fn bootstrap_schema(&self) -> bool {
        match self.ensure_schema().await {
            Ok(()) => true,
            Err(err) => {
                warn!("Catalog schema bootstrap failed, continuing: {}", err);
                false
            }
        }
    }
}

/// Appends the structured predicates of `request` as a WHERE clause.
fn push_predicates(builder: &mut QueryBuilder<'_, Postgres>, request: &FilterRequest) {
    let mut separator = " WHERE ";

    if let Some(category) = request.category {
        builder.push(separator).push("p.category_id = ").push_bind(category);
        separator = " AND ";
    }
    if let Some(min_price) = request.min_price {
        builder.push(separator).push("p.price >= ").push_bind(min_price);
        separator = " AND ";
    }
    if let Some(max_price) = request.max_price {
        builder.push(separator).push("p.price <= ").push_bind(max_price);
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    async fn find_products(&self, request: &FilterRequest) -> StoreResult<(Vec<Product>, u64)> {
        let mut select = QueryBuilder::<Postgres>::new(PRODUCT_COLUMNS);
        push_predicates(&mut select, request);
        select
            .push(" ORDER BY p.id LIMIT ")
            .push_bind(i64::from(request.limit))
            .push(" OFFSET ")
            .push_bind(i64::from(request.offset));

        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM products p");
        push_predicates(&mut count, request);

        debug!("Listing products: {}", select.sql());

        let rows = select
            .build_query_as::<ProductRow>()
            .fetch_all(&self.pool)
            .await?;
        let total = count
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        let products = rows.into_iter().map(Product::from).collect();
        Ok((products, total.max(0) as u64))
    }

    async fn find_product(&self, id: i32) -> StoreResult<Option<Product>> {
        let mut query = QueryBuilder::<Postgres>::new(PRODUCT_COLUMNS);
        query.push(" WHERE p.id = ").push_bind(id);

        let row = query
            .build_query_as::<ProductRow>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Product::from))
    }

    async fn all_products(&self) -> StoreResult<Vec<Product>> {
        let mut query = QueryBuilder::<Postgres>::new(PRODUCT_COLUMNS);
        query.push(" ORDER BY p.id");

        let rows = query
            .build_query_as::<ProductRow>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Product::from).collect())
    }
}
