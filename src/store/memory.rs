//! In-memory catalog store
//!
//! Holds catalog rows in process while honoring the same integrity rules as
//! the Postgres schema: unique SKUs and slugs, non-negative two-digit prices,
//! and detach-on-delete for categories. It also counts queries and can be
//! switched offline, which makes resolver behavior observable.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::models::product::{validate_price, PRICE_SCALE};
use crate::models::{Category, FilterRequest, NewProduct, Product};
use crate::store::CatalogStore;

#[derive(Debug, Default)]
struct Tables {
    categories: Vec<Category>,
    products: Vec<Product>,
    next_category_id: i32,
    next_product_id: i32,
}

impl Tables {
    fn category(&self, id: i32) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }
}

// == In-Memory Catalog Store ==
#[derive(Debug)]
pub struct InMemoryCatalogStore {
    tables: RwLock<Tables>,
    available: AtomicBool,
    queries: AtomicUsize,
}

impl Default for InMemoryCatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables {
                next_category_id: 1,
                next_product_id: 1,
                ..Tables::default()
            }),
            available: AtomicBool::new(true),
            queries: AtomicUsize::new(0),
        }
    }

    // == Writes ==
    /// Inserts a category and returns it with its assigned id.
    pub async fn insert_category(
        &self,
        name: impl Into<String>,
        slug: impl Into<String>,
    ) -> StoreResult<Category> {
        let slug = slug.into();
        let mut tables = self.tables.write().await;

        if tables.categories.iter().any(|c| c.slug == slug) {
            return Err(StoreError::Constraint(format!(
                "category slug '{}' already exists",
                slug
            )));
        }

        let category = Category {
            id: tables.next_category_id,
            name: name.into(),
            slug,
        };
        tables.next_category_id += 1;
        tables.categories.push(category.clone());
        Ok(category)
    }

    /// Inserts a product and returns it joined with its category.
    pub async fn insert_product(&self, new: NewProduct) -> StoreResult<Product> {
        if let Some(message) = validate_price(&new.price) {
            return Err(StoreError::Constraint(message));
        }

        // NUMERIC(10, 2): always two fractional digits
        let mut price = new.price;
        price.rescale(PRICE_SCALE);

        let mut tables = self.tables.write().await;

        if tables.products.iter().any(|p| p.sku == new.sku) {
            return Err(StoreError::Constraint(format!(
                "sku '{}' already exists",
                new.sku
            )));
        }

        let category = match new.category_id {
            Some(id) => Some(tables.category(id).cloned().ok_or_else(|| {
                StoreError::Constraint(format!("category {} does not exist", id))
            })?),
            None => None,
        };

        let product = Product {
            id: tables.next_product_id,
            sku: new.sku,
            name: new.name,
            description: new.description,
            price,
            category_id: new.category_id,
            category,
            created_at: Utc::now().naive_utc(),
        };
        tables.next_product_id += 1;
        tables.products.push(product.clone());
        Ok(product)
    }

    /// Deletes a category, detaching its products instead of deleting them.
    ///
    /// Returns whether the category existed.
    pub async fn delete_category(&self, id: i32) -> bool {
        let mut tables = self.tables.write().await;

        let before = tables.categories.len();
        tables.categories.retain(|c| c.id != id);
        if tables.categories.len() == before {
            return false;
        }

        for product in tables.products.iter_mut().filter(|p| p.category_id == Some(id)) {
            product.category_id = None;
            product.category = None;
        }
        true
    }

    // == Test Controls ==
    /// Simulates the store going offline (false) or coming back (true).
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Number of read queries served so far.
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    fn begin_query(&self) -> StoreResult<()> {
        if !self.available.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("in-memory store is offline".to_string()));
        }
        self.queries.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Conjunction of the supplied structured predicates.
fn matches(product: &Product, request: &FilterRequest) -> bool {
    request.category.map_or(true, |c| product.category_id == Some(c))
        && request.min_price.map_or(true, |min| product.price >= min)
        && request.max_price.map_or(true, |max| product.price <= max)
}

#[async_trait]
impl CatalogStore for InMemoryCatalogStore {
    async fn find_products(&self, request: &FilterRequest) -> StoreResult<(Vec<Product>, u64)> {
        self.begin_query()?;
        let tables = self.tables.read().await;

        let matching: Vec<&Product> = tables
            .products
            .iter()
            .filter(|p| matches(p, request))
            .collect();
        let total = matching.len() as u64;

        let page = matching
            .into_iter()
            .skip(request.offset as usize)
            .take(request.limit as usize)
            .cloned()
            .collect();

        Ok((page, total))
    }

    async fn find_product(&self, id: i32) -> StoreResult<Option<Product>> {
        self.begin_query()?;
        let tables = self.tables.read().await;
        Ok(tables.products.iter().find(|p| p.id == id).cloned())
    }

    async fn all_products(&self) -> StoreResult<Vec<Product>> {
        self.begin_query()?;
        Ok(self.tables.read().await.products.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    async fn seeded() -> InMemoryCatalogStore {
        let store = InMemoryCatalogStore::new();
        let electronics = store.insert_category("Electronics", "electronics").await.unwrap();
        let books = store.insert_category("Books", "books").await.unwrap();

        for (i, (price, category)) in [
            (50, electronics.id),
            (150, electronics.id),
            (450, electronics.id),
            (900, electronics.id),
            (200, books.id),
        ]
        .into_iter()
        .enumerate()
        {
            store
                .insert_product(
                    NewProduct::new(
                        format!("SKU{:06}", i),
                        format!("Item {}", i),
                        Decimal::from(price),
                    )
                    .in_category(category),
                )
                .await
                .unwrap();
        }
        store
    }

    #[tokio::test]
    async fn test_unfiltered_listing() {
        let store = seeded().await;

        let (items, total) = store.find_products(&FilterRequest::new()).await.unwrap();
        assert_eq!(items.len(), 5);
        assert_eq!(total, 5);
        assert!(items.iter().all(|p| p.category.is_some()));
    }

    #[tokio::test]
    async fn test_conjunctive_predicates() {
        let store = seeded().await;
        let request = FilterRequest::new()
            .category(1)
            .min_price(Decimal::from(100))
            .max_price(Decimal::from(500));

        let (items, total) = store.find_products(&request).await.unwrap();
        assert_eq!(total, 2);
        assert_eq!(items.len(), 2);
    }

    #[tokio::test]
    async fn test_price_bounds_are_inclusive() {
        let store = seeded().await;
        let request = FilterRequest::new()
            .min_price(Decimal::from(150))
            .max_price(Decimal::from(450));

        let (_, total) = store.find_products(&request).await.unwrap();
        assert_eq!(total, 3);
    }

    #[tokio::test]
    async fn test_total_ignores_pagination() {
        let store = seeded().await;
        let request = FilterRequest::new().page(2, 4);

        let (items, total) = store.find_products(&request).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(total, 5);
    }

    #[tokio::test]
    async fn test_prices_carry_two_fractional_digits() {
        let store = InMemoryCatalogStore::new();

        let whole = store
            .insert_product(NewProduct::new("A", "A", Decimal::from(100)))
            .await
            .unwrap();
        let one_digit = store
            .insert_product(NewProduct::new("B", "B", Decimal::new(125, 1)))
            .await
            .unwrap();

        assert_eq!(whole.price.to_string(), "100.00");
        assert_eq!(one_digit.price.to_string(), "12.50");
        assert_eq!(serde_json::to_value(&whole).unwrap()["price"], "100.00");
    }

    #[tokio::test]
    async fn test_duplicate_sku_rejected() {
        let store = seeded().await;

        let result = store
            .insert_product(NewProduct::new("SKU000000", "Copy", Decimal::from(1)))
            .await;
        assert!(matches!(result, Err(StoreError::Constraint(_))));
    }

    #[tokio::test]
    async fn test_invalid_price_rejected() {
        let store = InMemoryCatalogStore::new();

        let negative = store
            .insert_product(NewProduct::new("A", "A", Decimal::from(-1)))
            .await;
        let too_precise = store
            .insert_product(NewProduct::new("B", "B", Decimal::new(1001, 3)))
            .await;

        assert!(matches!(negative, Err(StoreError::Constraint(_))));
        assert!(matches!(too_precise, Err(StoreError::Constraint(_))));
    }

    #[tokio::test]
    async fn test_delete_category_detaches_products() {
        let store = seeded().await;

        assert!(store.delete_category(2).await);

        let (items, total) = store.find_products(&FilterRequest::new()).await.unwrap();
        assert_eq!(total, 5);
        let detached = items.iter().find(|p| p.sku == "SKU000004").unwrap();
        assert!(detached.category_id.is_none());
        assert!(detached.category.is_none());
    }

    #[tokio::test]
    async fn test_offline_store_fails_queries() {
        let store = seeded().await;
        store.set_available(false);

        let result = store.find_products(&FilterRequest::new()).await;
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
        assert_eq!(store.query_count(), 0);
    }
}
