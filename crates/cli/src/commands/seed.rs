//! Seed the catalog with demo products.

use storeroom_core::Price;
use storeroom_shop::db::ProductRepository;

/// Demo products: name, description, price, stock.
const DEMO_PRODUCTS: &[(&str, &str, &str, i64)] = &[
    (
        "Enamel mug",
        "12 oz camp mug, speckled navy",
        "14.00",
        40,
    ),
    (
        "Beeswax candle",
        "Hand-poured, about 30 hours of burn time",
        "9.50",
        60,
    ),
    (
        "Canvas tote",
        "Heavyweight cotton, flat bottom",
        "22.00",
        25,
    ),
    (
        "Field notebook",
        "48 pages, dot grid, stitched spine",
        "6.75",
        100,
    ),
];

/// Insert demo products into an empty catalog.
///
/// Does nothing if any products already exist.
///
/// # Errors
///
/// Returns an error if the database is unreachable or an insert fails.
pub async fn demo_products() -> Result<(), Box<dyn std::error::Error>> {
    let pool = super::connect().await?;
    let products = ProductRepository::new(&pool);

    if !products.list_all().await?.is_empty() {
        tracing::info!("Catalog is not empty, skipping seed");
        return Ok(());
    }

    for (name, description, price, stock) in DEMO_PRODUCTS {
        let price = Price::parse(price)?;
        let product = products.create(name, description, price, *stock).await?;
        tracing::info!(product_id = %product.id, name = %product.name, "Seeded product");
    }

    tracing::info!("Seeded {} products", DEMO_PRODUCTS.len());
    Ok(())
}
