//! Domain types.
//!
//! These types represent validated domain objects separate from database
//! row types (which live next to their repositories in `db/`).

pub mod cart;
pub mod order;
pub mod product;
pub mod session;
pub mod user;

pub use cart::{CartItem, CartLine};
pub use order::{AdminOrder, Order, OrderItem, OrderLine, OrderWithItems, PlacedOrder};
pub use product::Product;
pub use session::{CurrentUser, session_keys};
pub use user::User;
