//! Database migration command.
//!
//! Applies the migrations embedded in the shop crate
//! (`crates/shop/migrations/`). Safe to re-run; already-applied migrations
//! are skipped.

use storeroom_shop::db;

/// Run database migrations.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let pool = super::connect().await?;

    tracing::info!("Running migrations...");
    db::MIGRATOR.run(&pool).await?;

    tracing::info!("Migrations complete");
    Ok(())
}
