//! Catalog rows
//!
//! Products, their categories and the flat document projection pushed to
//! the search index.

use chrono::NaiveDateTime;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Number of fractional digits a price carries.
pub const PRICE_SCALE: u32 = 2;

// == Category ==
/// A product category. Referenced by products, never embedded in storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i32,
    pub name: String,
    /// Unique across categories
    pub slug: String,
}

// == Product ==
/// A catalog product joined with its category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i32,
    /// Unique external identifier
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    /// Non-negative, two fractional digits
    pub price: Decimal,
    /// Detached (None) when the category is deleted
    pub category_id: Option<i32>,
    #[serde(default)]
    pub category: Option<Category>,
    /// Server-assigned, immutable
    pub created_at: NaiveDateTime,
}

// == New Product ==
/// Insert payload for a product; id and creation time are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub category_id: Option<i32>,
}

impl NewProduct {
    /// Creates an insert payload with no description or category.
    pub fn new(sku: impl Into<String>, name: impl Into<String>, price: Decimal) -> Self {
        Self {
            sku: sku.into(),
            name: name.into(),
            description: None,
            price,
            category_id: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn in_category(mut self, category_id: i32) -> Self {
        self.category_id = Some(category_id);
        self
    }
}

// == Product Document ==
/// Flat, denormalized product projection stored in the search index.
///
/// The price is carried as a float here, so it may lose precision compared
/// to the stored decimal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDocument {
    pub id: i32,
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub category_id: Option<i32>,
    pub category_name: Option<String>,
}

impl From<&Product> for ProductDocument {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            sku: product.sku.clone(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price.to_f64().unwrap_or_default(),
            category_id: product.category_id,
            category_name: product.category.as_ref().map(|c| c.name.clone()),
        }
    }
}

// == Price Validation ==
/// Returns an error message when `price` is negative or has more than two
/// fractional digits, None if valid.
pub fn validate_price(price: &Decimal) -> Option<String> {
    if price.is_sign_negative() && !price.is_zero() {
        return Some(format!("Price {} must not be negative", price));
    }
    if price.normalize().scale() > PRICE_SCALE {
        return Some(format!(
            "Price {} has more than {} fractional digits",
            price, PRICE_SCALE
        ));
    }
    None
}
