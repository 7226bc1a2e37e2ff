//! Database operations for the shop `SQLite` store.
//!
//! ## Tables
//!
//! - `users` - Accounts (password login, role, active flag)
//! - `products` - Catalog with price and stock counters
//! - `cart_items` - Per-user cart lines, one per (user, product)
//! - `orders` / `order_items` - Immutable placed orders with price snapshots
//! - `sessions` - Tower-sessions storage (created by the session store)
//!
//! # Migrations
//!
//! Migrations are stored in `crates/shop/migrations/`, embedded into the
//! binary via [`MIGRATOR`], and run via:
//! ```bash
//! cargo run -p storeroom-cli -- migrate
//! ```
//! The server also applies them on startup so a fresh database file works
//! out of the box.

pub mod cart;
pub mod orders;
pub mod products;
pub mod users;

use std::str::FromStr;
use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::SqlitePool;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use thiserror::Error;

pub use cart::{CartError, CartRepository};
pub use orders::{OrderError, OrderRepository};
pub use products::ProductRepository;
pub use users::UserRepository;

/// Embedded migrations from `crates/shop/migrations/`.
pub static MIGRATOR: Migrator = sqlx::migrate!();

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique username).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `SQLite` connection pool with sensible defaults.
///
/// Foreign keys are enabled on every connection; the database file is
/// created if missing.
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the URL is invalid or the connection cannot be
/// established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url.expose_secret())?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    SqlitePoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await
}
