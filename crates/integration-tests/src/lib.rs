//! Integration tests for Storeroom.
//!
//! The tests exercise the stores and the order engine against an in-memory
//! `SQLite` database with the real migrations applied, so they need no
//! external services:
//!
//! ```bash
//! cargo test -p storeroom-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `accounts` - Registration, login, activation toggling
//! - `cart` - Cart merging, stock read-checks, removal
//! - `orders` - The order placement transaction and its properties

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use storeroom_core::{Price, Role};
use storeroom_shop::db::{
    CartRepository, MIGRATOR, OrderRepository, ProductRepository, UserRepository,
};
use storeroom_shop::models::{Product, User};
use storeroom_shop::services::auth::AuthService;

/// Password used for every fixture account.
pub const TEST_PASSWORD: &str = "password123";

/// A fresh store backed by in-memory `SQLite` with migrations applied.
///
/// The pool is capped at one connection: every connection to `:memory:`
/// gets its own database, so a larger pool would scatter the tables.
pub struct TestStore {
    pub pool: SqlitePool,
}

impl TestStore {
    /// Create an empty store.
    ///
    /// # Panics
    ///
    /// Panics if the in-memory database cannot be set up.
    pub async fn new() -> Self {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .expect("valid sqlite url")
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .expect("connect to in-memory sqlite");

        MIGRATOR.run(&pool).await.expect("apply migrations");

        Self { pool }
    }

    #[must_use]
    pub const fn auth(&self) -> AuthService<'_> {
        AuthService::new(&self.pool)
    }

    #[must_use]
    pub const fn users(&self) -> UserRepository<'_> {
        UserRepository::new(&self.pool)
    }

    #[must_use]
    pub const fn products(&self) -> ProductRepository<'_> {
        ProductRepository::new(&self.pool)
    }

    #[must_use]
    pub const fn cart(&self) -> CartRepository<'_> {
        CartRepository::new(&self.pool)
    }

    #[must_use]
    pub const fn orders(&self) -> OrderRepository<'_> {
        OrderRepository::new(&self.pool)
    }

    /// Register a regular user with the fixture password.
    ///
    /// # Panics
    ///
    /// Panics if registration fails.
    pub async fn register_user(&self, username: &str) -> User {
        self.auth()
            .register(username, TEST_PASSWORD, Role::User)
            .await
            .expect("register fixture user")
    }

    /// Add a product to the catalog.
    ///
    /// # Panics
    ///
    /// Panics if the price is invalid or the insert fails.
    pub async fn add_product(&self, name: &str, price: &str, stock: i64) -> Product {
        let price = Price::parse(price).expect("valid fixture price");
        self.products()
            .create(name, "", price, stock)
            .await
            .expect("create fixture product")
    }
}
