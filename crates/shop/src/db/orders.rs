//! Order repository: the order placement transaction and order queries.
//!
//! `place_order` is the one operation in the system that needs true
//! atomicity: the stock re-check, the order insert, the stock decrement and
//! the cart drain all happen inside a single transaction, and any failure
//! rolls the whole thing back.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use thiserror::Error;
use uuid::Uuid;

use storeroom_core::{OrderId, OrderItemId, OrderStatus, Price, ProductId, UserId};

use super::RepositoryError;
use crate::models::order::{AdminOrder, Order, OrderItem, OrderLine, OrderWithItems, PlacedOrder};

/// Errors that can occur during order operations.
#[derive(Debug, Error)]
pub enum OrderError {
    /// The user's cart has no lines.
    #[error("cart is empty")]
    EmptyCart,

    /// A line's quantity exceeds the product's stock at transaction time.
    #[error("not enough stock for {name} (available: {available})")]
    InsufficientStock {
        /// Product display name.
        name: String,
        /// Stock available at check time.
        available: i64,
    },

    /// The order doesn't exist.
    #[error("order not found")]
    NotFound,

    /// Underlying repository/database error.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<sqlx::Error> for OrderError {
    fn from(e: sqlx::Error) -> Self {
        Self::Repository(RepositoryError::Database(e))
    }
}

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for order queries.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i64,
    order_uid: String,
    user_id: i64,
    total_cents: i64,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = RepositoryError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let status: OrderStatus = row.status.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid order status in database: {e}"))
        })?;

        Ok(Self {
            id: OrderId::new(row.id),
            order_uid: row.order_uid,
            user_id: UserId::new(row.user_id),
            total: Price::from_cents(row.total_cents),
            status,
            created_at: row.created_at,
        })
    }
}

/// Internal row type for order items joined with product names.
#[derive(Debug, sqlx::FromRow)]
struct OrderLineRow {
    id: i64,
    order_id: i64,
    product_id: i64,
    quantity: i64,
    price_at_purchase_cents: i64,
    name: String,
}

impl From<OrderLineRow> for OrderLine {
    fn from(row: OrderLineRow) -> Self {
        Self {
            item: OrderItem {
                id: OrderItemId::new(row.id),
                order_id: OrderId::new(row.order_id),
                product_id: ProductId::new(row.product_id),
                quantity: row.quantity,
                price_at_purchase: Price::from_cents(row.price_at_purchase_cents),
            },
            product_name: row.name,
        }
    }
}

/// Internal row type for the cart lines consumed by a placement.
#[derive(Debug, sqlx::FromRow)]
struct PlacementLineRow {
    product_id: i64,
    quantity: i64,
    name: String,
    price_cents: i64,
    stock: i64,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Convert a user's cart into a placed order, all-or-nothing.
    ///
    /// Within one transaction: load the cart with resolved products,
    /// re-check stock per line (the cart's add-time check may be stale),
    /// snapshot each product's current price into an order item, decrement
    /// stock with a guarded update, and drain the cart. Any failure leaves
    /// the store untouched.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::EmptyCart` if the cart has no lines.
    /// Returns `OrderError::InsufficientStock` on the first line whose
    /// quantity exceeds the available stock.
    /// Returns `OrderError::Repository` if any statement fails; the
    /// transaction rolls back in every error case.
    pub async fn place_order(&self, user_id: UserId) -> Result<PlacedOrder, OrderError> {
        let mut tx = self.pool.begin().await?;

        let lines = sqlx::query_as::<_, PlacementLineRow>(
            r"
            SELECT ci.product_id, ci.quantity, p.name, p.price_cents, p.stock
            FROM cart_items ci
            JOIN products p ON p.id = ci.product_id
            WHERE ci.user_id = ?1
            ORDER BY ci.id ASC
            ",
        )
        .bind(user_id.as_i64())
        .fetch_all(&mut *tx)
        .await?;

        if lines.is_empty() {
            return Err(OrderError::EmptyCart);
        }

        for line in &lines {
            if line.stock < line.quantity {
                return Err(OrderError::InsufficientStock {
                    name: line.name.clone(),
                    available: line.stock,
                });
            }
        }

        let total_cents: i64 = lines
            .iter()
            .map(|line| line.price_cents.saturating_mul(line.quantity))
            .sum();
        let order_uid = Uuid::new_v4().to_string();
        let created_at = Utc::now();

        let result = sqlx::query(
            r"
            INSERT INTO orders (order_uid, user_id, total_cents, status, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ",
        )
        .bind(&order_uid)
        .bind(user_id.as_i64())
        .bind(total_cents)
        .bind(OrderStatus::Pending.as_str())
        .bind(created_at)
        .execute(&mut *tx)
        .await?;
        let order_id = result.last_insert_rowid();

        for line in &lines {
            sqlx::query(
                r"
                INSERT INTO order_items (order_id, product_id, quantity, price_at_purchase_cents)
                VALUES (?1, ?2, ?3, ?4)
                ",
            )
            .bind(order_id)
            .bind(line.product_id)
            .bind(line.quantity)
            .bind(line.price_cents)
            .execute(&mut *tx)
            .await?;

            // Guarded decrement: a writer that committed between our read and
            // this write makes rows_affected zero instead of driving stock
            // negative.
            let updated = sqlx::query(
                r"
                UPDATE products
                SET stock = stock - ?1, updated_at = ?2
                WHERE id = ?3 AND stock >= ?1
                ",
            )
            .bind(line.quantity)
            .bind(created_at)
            .bind(line.product_id)
            .execute(&mut *tx)
            .await?;

            if updated.rows_affected() == 0 {
                let (available,): (i64,) =
                    sqlx::query_as("SELECT stock FROM products WHERE id = ?1")
                        .bind(line.product_id)
                        .fetch_one(&mut *tx)
                        .await?;

                return Err(OrderError::InsufficientStock {
                    name: line.name.clone(),
                    available,
                });
            }
        }

        sqlx::query("DELETE FROM cart_items WHERE user_id = ?1")
            .bind(user_id.as_i64())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(%order_uid, user_id = %user_id, total_cents, "order placed");

        Ok(PlacedOrder {
            order_uid,
            total: Price::from_cents(total_cents),
        })
    }

    /// Set an order's status. Any status may follow any other.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NotFound` if the order doesn't exist.
    pub async fn update_status(
        &self,
        order_id: OrderId,
        status: OrderStatus,
    ) -> Result<(), OrderError> {
        let result = sqlx::query("UPDATE orders SET status = ?1 WHERE id = ?2")
            .bind(status.as_str())
            .bind(order_id.as_i64())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(OrderError::NotFound);
        }

        Ok(())
    }

    /// List a user's orders, newest first, with items and product names
    /// join-loaded.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    /// Returns `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn list_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<OrderWithItems>, RepositoryError> {
        let order_rows = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT id, order_uid, user_id, total_cents, status, created_at
            FROM orders
            WHERE user_id = ?1
            ORDER BY created_at DESC, id DESC
            ",
        )
        .bind(user_id.as_i64())
        .fetch_all(self.pool)
        .await?;

        let line_rows = sqlx::query_as::<_, OrderLineRow>(
            r"
            SELECT oi.id, oi.order_id, oi.product_id, oi.quantity,
                   oi.price_at_purchase_cents, p.name
            FROM order_items oi
            JOIN orders o ON o.id = oi.order_id
            JOIN products p ON p.id = oi.product_id
            WHERE o.user_id = ?1
            ORDER BY oi.id ASC
            ",
        )
        .bind(user_id.as_i64())
        .fetch_all(self.pool)
        .await?;

        let mut lines_by_order = group_lines(line_rows);

        order_rows
            .into_iter()
            .map(|row| {
                let order = Order::try_from(row)?;
                let lines = lines_by_order.remove(&order.id.as_i64()).unwrap_or_default();
                Ok(OrderWithItems { order, lines })
            })
            .collect()
    }

    /// List every order in the store, newest first, with the owning
    /// username and items join-loaded - the administrative view.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    /// Returns `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn list_all(&self) -> Result<Vec<AdminOrder>, RepositoryError> {
        let order_rows = sqlx::query_as::<_, AdminOrderRow>(
            r"
            SELECT o.id, o.order_uid, o.user_id, o.total_cents, o.status, o.created_at,
                   u.username
            FROM orders o
            JOIN users u ON u.id = o.user_id
            ORDER BY o.created_at DESC, o.id DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        let line_rows = sqlx::query_as::<_, OrderLineRow>(
            r"
            SELECT oi.id, oi.order_id, oi.product_id, oi.quantity,
                   oi.price_at_purchase_cents, p.name
            FROM order_items oi
            JOIN products p ON p.id = oi.product_id
            ORDER BY oi.id ASC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        let mut lines_by_order = group_lines(line_rows);

        order_rows
            .into_iter()
            .map(|row| {
                let username = row.username.clone();
                let order = Order::try_from(OrderRow {
                    id: row.id,
                    order_uid: row.order_uid,
                    user_id: row.user_id,
                    total_cents: row.total_cents,
                    status: row.status,
                    created_at: row.created_at,
                })?;
                let lines = lines_by_order.remove(&order.id.as_i64()).unwrap_or_default();
                Ok(AdminOrder {
                    order,
                    username,
                    lines,
                })
            })
            .collect()
    }
}

/// Internal row type for the administrative order listing.
#[derive(Debug, sqlx::FromRow)]
struct AdminOrderRow {
    id: i64,
    order_uid: String,
    user_id: i64,
    total_cents: i64,
    status: String,
    created_at: DateTime<Utc>,
    username: String,
}

/// Group line rows by their order id, preserving line order.
fn group_lines(rows: Vec<OrderLineRow>) -> HashMap<i64, Vec<OrderLine>> {
    let mut grouped: HashMap<i64, Vec<OrderLine>> = HashMap::new();
    for row in rows {
        grouped.entry(row.order_id).or_default().push(row.into());
    }
    grouped
}
