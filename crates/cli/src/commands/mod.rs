//! CLI command implementations.

pub mod admin;
pub mod migrate;
pub mod seed;

use sqlx::SqlitePool;

use storeroom_shop::config::ShopConfig;
use storeroom_shop::db;

/// Connect to the configured database.
///
/// # Errors
///
/// Returns an error if configuration loading or the connection fails.
pub async fn connect() -> Result<SqlitePool, Box<dyn std::error::Error>> {
    let config = ShopConfig::from_env()?;
    let pool = db::create_pool(&config.database_url).await?;
    Ok(pool)
}
