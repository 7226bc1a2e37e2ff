//! Product domain types.

use chrono::{DateTime, Utc};

use storeroom_core::{Price, ProductId};

/// A catalog product (domain type).
#[derive(Debug, Clone)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Current list price. Orders snapshot this at placement time.
    pub price: Price,
    /// Available inventory. Never negative.
    pub stock: i64,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
    /// When the product was last mutated (price, stock).
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Whether any inventory is available.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }
}
