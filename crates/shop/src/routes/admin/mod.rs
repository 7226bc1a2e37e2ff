//! Back office route handlers.
//!
//! Every handler takes the [`RequireAdmin`](crate::middleware::RequireAdmin)
//! extractor; regular users get a 403 and anonymous visitors are sent to
//! the login page.

pub mod orders;
pub mod products;
pub mod users;

use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};

use crate::state::AppState;

/// Redirect the back office landing page to the order list.
async fn home() -> Redirect {
    Redirect::to("/admin/orders")
}

/// Create the back office router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/products", get(products::page).post(products::create))
        .route("/products/{id}/stock", post(products::adjust_stock))
        .route("/products/{id}/price", post(products::update_price))
        .route("/users", get(users::page))
        .route("/users/{id}/toggle", post(users::toggle))
        .route("/orders", get(orders::page))
        .route("/orders/{id}/status", post(orders::set_status))
}
