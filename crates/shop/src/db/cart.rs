//! Cart repository for database operations.
//!
//! Adding to the cart is a read-check only: stock is verified against the
//! prospective line quantity but nothing is reserved. The authoritative
//! check happens inside the order placement transaction.

use sqlx::SqlitePool;
use thiserror::Error;

use storeroom_core::{CartItemId, ProductId, UserId};

use super::RepositoryError;
use super::products::ProductRow;
use crate::models::cart::{CartItem, CartLine};

/// Errors that can occur during cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// Requested quantity below 1.
    #[error("quantity must be at least 1")]
    InvalidQuantity,

    /// The referenced product doesn't exist.
    #[error("product not found")]
    ProductNotFound,

    /// The prospective line quantity exceeds the available stock.
    #[error("not enough stock for {name} (available: {available})")]
    InsufficientStock {
        /// Product display name.
        name: String,
        /// Stock available at check time.
        available: i64,
    },

    /// The cart item doesn't exist.
    #[error("cart item not found")]
    NotFound,

    /// Underlying repository/database error.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<sqlx::Error> for CartError {
    fn from(e: sqlx::Error) -> Self {
        Self::Repository(RepositoryError::Database(e))
    }
}

/// Internal row type for cart lines joined with their product.
#[derive(Debug, sqlx::FromRow)]
struct CartLineRow {
    id: i64,
    user_id: i64,
    product_id: i64,
    quantity: i64,
    name: String,
    description: String,
    price_cents: i64,
    stock: i64,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<CartLineRow> for CartLine {
    fn from(row: CartLineRow) -> Self {
        Self {
            item: CartItem {
                id: CartItemId::new(row.id),
                user_id: UserId::new(row.user_id),
                product_id: ProductId::new(row.product_id),
                quantity: row.quantity,
            },
            product: ProductRow {
                id: row.product_id,
                name: row.name,
                description: row.description,
                price_cents: row.price_cents,
                stock: row.stock,
                created_at: row.created_at,
                updated_at: row.updated_at,
            }
            .into(),
        }
    }
}

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Add a product to a user's cart, merging into an existing line.
    ///
    /// The prospective quantity (existing + requested for a merge, requested
    /// for a new line) must not exceed the product's current stock. Stock is
    /// not decremented here.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidQuantity` if `quantity < 1`.
    /// Returns `CartError::ProductNotFound` if the product doesn't exist.
    /// Returns `CartError::InsufficientStock` if the prospective quantity
    /// exceeds the available stock.
    pub async fn add_item(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i64,
    ) -> Result<(), CartError> {
        if quantity < 1 {
            return Err(CartError::InvalidQuantity);
        }

        // One transaction so the merge check and the write see the same rows.
        let mut tx = self.pool.begin().await?;

        let product: Option<(String, i64)> =
            sqlx::query_as("SELECT name, stock FROM products WHERE id = ?1")
                .bind(product_id.as_i64())
                .fetch_optional(&mut *tx)
                .await?;

        let Some((name, stock)) = product else {
            return Err(CartError::ProductNotFound);
        };

        let existing: Option<(i64, i64)> = sqlx::query_as(
            "SELECT id, quantity FROM cart_items WHERE user_id = ?1 AND product_id = ?2",
        )
        .bind(user_id.as_i64())
        .bind(product_id.as_i64())
        .fetch_optional(&mut *tx)
        .await?;

        match existing {
            Some((item_id, existing_quantity)) => {
                if existing_quantity + quantity > stock {
                    return Err(CartError::InsufficientStock {
                        name,
                        available: stock,
                    });
                }

                sqlx::query("UPDATE cart_items SET quantity = quantity + ?1 WHERE id = ?2")
                    .bind(quantity)
                    .bind(item_id)
                    .execute(&mut *tx)
                    .await?;
            }
            None => {
                if quantity > stock {
                    return Err(CartError::InsufficientStock {
                        name,
                        available: stock,
                    });
                }

                sqlx::query(
                    "INSERT INTO cart_items (user_id, product_id, quantity) VALUES (?1, ?2, ?3)",
                )
                .bind(user_id.as_i64())
                .bind(product_id.as_i64())
                .bind(quantity)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;

        Ok(())
    }

    /// List a user's cart with products join-loaded.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<CartLine>, RepositoryError> {
        let rows = sqlx::query_as::<_, CartLineRow>(
            r"
            SELECT ci.id, ci.user_id, ci.product_id, ci.quantity,
                   p.name, p.description, p.price_cents, p.stock,
                   p.created_at, p.updated_at
            FROM cart_items ci
            JOIN products p ON p.id = ci.product_id
            WHERE ci.user_id = ?1
            ORDER BY ci.id ASC
            ",
        )
        .bind(user_id.as_i64())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Remove a cart item.
    ///
    /// # Errors
    ///
    /// Returns `CartError::NotFound` if the item doesn't exist.
    pub async fn remove(&self, cart_item_id: CartItemId) -> Result<(), CartError> {
        let result = sqlx::query("DELETE FROM cart_items WHERE id = ?1")
            .bind(cart_item_id.as_i64())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CartError::NotFound);
        }

        Ok(())
    }
}
