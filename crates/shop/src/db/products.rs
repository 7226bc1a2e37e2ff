//! Product repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use storeroom_core::{Price, ProductId};

use super::RepositoryError;
use crate::models::product::Product;

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for product queries.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ProductRow {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) price_cents: i64,
    pub(crate) stock: i64,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::new(row.id),
            name: row.name,
            description: row.description,
            price: Price::from_cents(row.price_cents),
            stock: row.stock,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new product.
    ///
    /// Price and stock are validated non-negative at the presentation
    /// boundary; the schema CHECKs backstop that here.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        name: &str,
        description: &str,
        price: Price,
        stock: i64,
    ) -> Result<Product, RepositoryError> {
        let now = Utc::now();

        let result = sqlx::query(
            r"
            INSERT INTO products (name, description, price_cents, stock, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?5)
            ",
        )
        .bind(name)
        .bind(description)
        .bind(price.as_cents())
        .bind(stock)
        .bind(now)
        .execute(self.pool)
        .await?;

        Ok(Product {
            id: ProductId::new(result.last_insert_rowid()),
            name: name.to_owned(),
            description: description.to_owned(),
            price,
            stock,
            created_at: now,
            updated_at: now,
        })
    }

    /// Get a product by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, name, description, price_cents, stock, created_at, updated_at
            FROM products
            WHERE id = ?1
            ",
        )
        .bind(id.as_i64())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// List all products, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, name, description, price_cents, stock, created_at, updated_at
            FROM products
            ORDER BY id ASC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Apply a stock delta (`stock += delta`) and refresh `updated_at`.
    ///
    /// This primitive does not itself keep the result non-negative; callers
    /// must, and the schema CHECK rejects anything that slips through.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors
    /// (including a CHECK violation on a below-zero result).
    pub async fn adjust_stock(&self, id: ProductId, delta: i64) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE products
            SET stock = stock + ?1, updated_at = ?2
            WHERE id = ?3
            ",
        )
        .bind(delta)
        .bind(Utc::now())
        .bind(id.as_i64())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Change a product's list price and refresh `updated_at`.
    ///
    /// Already-placed orders keep their snapshotted `price_at_purchase`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_price(&self, id: ProductId, price: Price) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE products
            SET price_cents = ?1, updated_at = ?2
            WHERE id = ?3
            ",
        )
        .bind(price.as_cents())
        .bind(Utc::now())
        .bind(id.as_i64())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
