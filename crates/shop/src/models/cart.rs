//! Cart domain types.

use storeroom_core::{CartItemId, Price, ProductId, UserId};

use super::product::Product;

/// A single cart line (domain type).
///
/// At most one exists per (user, product) pair; repeat adds merge into the
/// existing line.
#[derive(Debug, Clone)]
pub struct CartItem {
    /// Unique cart item ID.
    pub id: CartItemId,
    /// Owning user.
    pub user_id: UserId,
    /// Referenced product.
    pub product_id: ProductId,
    /// Requested quantity, always >= 1.
    pub quantity: i64,
}

/// A cart line with its product resolved.
#[derive(Debug, Clone)]
pub struct CartLine {
    /// The cart line itself.
    pub item: CartItem,
    /// The referenced product at read time.
    pub product: Product,
}

impl CartLine {
    /// The line subtotal at the product's current price.
    ///
    /// Informational only; the authoritative total is computed inside the
    /// order placement transaction.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.product.price.times(self.item.quantity)
    }
}
