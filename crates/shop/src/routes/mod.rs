//! HTTP route handlers for the shop.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                        - Redirect to product listing
//! GET  /health                  - Liveness check
//! GET  /health/ready            - Readiness check (pings the database)
//!
//! # Auth
//! GET  /auth/login              - Login page
//! POST /auth/login              - Login action
//! GET  /auth/register           - Register page
//! POST /auth/register           - Register action
//! POST /auth/logout             - Logout action
//!
//! # Catalog
//! GET  /products                - Product listing (add-to-cart for users)
//!
//! # Cart (requires auth)
//! GET  /cart                    - Cart page
//! POST /cart/add                - Add/merge a line
//! POST /cart/remove             - Remove a line
//! POST /cart/checkout           - Place the order
//!
//! # Orders (requires auth)
//! GET  /orders                  - Current user's orders, newest first
//!
//! # Back office (requires admin)
//! GET  /admin                   - Redirect to /admin/orders
//! GET  /admin/products          - Catalog management
//! POST /admin/products          - Add a product
//! POST /admin/products/{id}/stock  - Apply a stock delta
//! POST /admin/products/{id}/price  - Change the list price
//! GET  /admin/users             - User management
//! POST /admin/users/{id}/toggle - Activate/deactivate an account
//! GET  /admin/orders            - All orders
//! POST /admin/orders/{id}/status - Set fulfillment status
//! ```
//!
//! Handlers hold no business rules: they parse primitives, call the stores
//! and the order engine, and render the outcome. Business failures travel
//! as flash messages in `?error=`/`?success=` query parameters.

pub mod admin;
pub mod auth;
pub mod cart;
pub mod orders;
pub mod products;

use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};
use serde::Deserialize;

use crate::models::CurrentUser;
use crate::state::AppState;

// =============================================================================
// Shared page plumbing
// =============================================================================

/// Query parameters for flash message display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Data for the shared page chrome (navigation bar).
pub struct Nav {
    /// Username of the signed-in user, if any.
    pub username: Option<String>,
    /// Whether the signed-in user may see back office links.
    pub is_admin: bool,
}

impl Nav {
    /// Build the nav context from an optional session user.
    #[must_use]
    pub fn for_user(user: Option<&CurrentUser>) -> Self {
        Self {
            username: user.map(|u| u.username.to_string()),
            is_admin: user.is_some_and(|u| u.role.is_admin()),
        }
    }
}

/// Redirect carrying an error flash message.
pub(crate) fn redirect_with_error(path: &str, message: &str) -> Redirect {
    Redirect::to(&format!("{path}?error={}", urlencoding::encode(message)))
}

/// Redirect carrying a success flash message.
pub(crate) fn redirect_with_success(path: &str, message: &str) -> Redirect {
    Redirect::to(&format!("{path}?success={}", urlencoding::encode(message)))
}

// =============================================================================
// Routers
// =============================================================================

/// Redirect the landing page to the catalog.
async fn home() -> Redirect {
    Redirect::to("/products")
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new().route("/", get(products::index))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/remove", post(cart::remove))
        .route("/checkout", post(cart::checkout))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new().route("/", get(orders::index))
}

/// Create all routes for the shop.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Landing page
        .route("/", get(home))
        // Catalog
        .nest("/products", product_routes())
        // Cart
        .nest("/cart", cart_routes())
        // Order history
        .nest("/orders", order_routes())
        // Auth
        .nest("/auth", auth_routes())
        // Back office
        .nest("/admin", admin::routes())
}
