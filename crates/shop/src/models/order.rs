//! Order domain types.

use chrono::{DateTime, Utc};

use storeroom_core::{OrderId, OrderItemId, OrderStatus, Price, ProductId, UserId};

/// A placed order (domain type).
///
/// Immutable once created, except for [`status`](Self::status).
#[derive(Debug, Clone)]
pub struct Order {
    /// Internal numeric ID.
    pub id: OrderId,
    /// Globally unique, externally shareable identifier (v4 UUID).
    pub order_uid: String,
    /// The user who placed the order.
    pub user_id: UserId,
    /// Sum of line subtotals at creation time.
    pub total: Price,
    /// Fulfillment status.
    pub status: OrderStatus,
    /// When the order was placed.
    pub created_at: DateTime<Utc>,
}

/// A line of a placed order (domain type).
///
/// Owned exclusively by its order and immutable; `price_at_purchase` stays
/// fixed regardless of later catalog price changes.
#[derive(Debug, Clone)]
pub struct OrderItem {
    /// Unique order item ID.
    pub id: OrderItemId,
    /// Owning order.
    pub order_id: OrderId,
    /// Referenced product.
    pub product_id: ProductId,
    /// Ordered quantity.
    pub quantity: i64,
    /// Product price snapshotted at placement time.
    pub price_at_purchase: Price,
}

/// An order line with the product name resolved for display.
#[derive(Debug, Clone)]
pub struct OrderLine {
    /// The order item itself.
    pub item: OrderItem,
    /// Name of the referenced product.
    pub product_name: String,
}

/// An order with its lines join-loaded.
#[derive(Debug, Clone)]
pub struct OrderWithItems {
    /// The order.
    pub order: Order,
    /// Its lines, with product names resolved.
    pub lines: Vec<OrderLine>,
}

/// An order with its owner resolved - the administrative view.
#[derive(Debug, Clone)]
pub struct AdminOrder {
    /// The order.
    pub order: Order,
    /// Username of the user who placed it.
    pub username: String,
    /// Its lines, with product names resolved.
    pub lines: Vec<OrderLine>,
}

/// The result of a successful order placement.
#[derive(Debug, Clone)]
pub struct PlacedOrder {
    /// The new order's globally unique identifier.
    pub order_uid: String,
    /// The order total.
    pub total: Price,
}
