//! Cart route handlers.
//!
//! Adding to the cart is a read-check against current stock; nothing is
//! reserved until checkout, which runs the order placement transaction.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use storeroom_core::{CartItemId, Price, ProductId};

use crate::db::{CartError, CartRepository, OrderError, OrderRepository};
use crate::error::AppError;
use crate::middleware::RequireAuth;
use crate::models::CartLine;
use crate::state::AppState;

use super::{MessageQuery, Nav, redirect_with_error, redirect_with_success};

// =============================================================================
// Form Types
// =============================================================================

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: i64,
    pub quantity: i64,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub cart_item_id: i64,
}

// =============================================================================
// Views & Templates
// =============================================================================

/// Cart line display data for templates.
pub struct CartLineView {
    pub id: i64,
    pub name: String,
    pub quantity: i64,
    pub subtotal: String,
}

impl From<&CartLine> for CartLineView {
    fn from(line: &CartLine) -> Self {
        Self {
            id: line.item.id.as_i64(),
            name: line.product.name.clone(),
            quantity: line.item.quantity,
            subtotal: line.subtotal().to_string(),
        }
    }
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartTemplate {
    pub nav: Nav,
    pub error: Option<String>,
    pub success: Option<String>,
    pub lines: Vec<CartLineView>,
    pub total: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the current user's cart.
#[instrument(skip(state, user, query))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(query): Query<MessageQuery>,
) -> Result<CartTemplate, AppError> {
    let lines = CartRepository::new(state.pool())
        .list_for_user(user.id)
        .await?;

    let total = Price::from_cents(lines.iter().map(|l| l.subtotal().as_cents()).sum());

    Ok(CartTemplate {
        nav: Nav::for_user(Some(&user)),
        error: query.error,
        success: query.success,
        lines: lines.iter().map(Into::into).collect(),
        total: total.to_string(),
    })
}

/// Add a product to the cart, merging with an existing line.
#[instrument(skip(state, user))]
pub async fn add(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Form(form): Form<AddToCartForm>,
) -> Result<Response, AppError> {
    let cart = CartRepository::new(state.pool());

    match cart
        .add_item(user.id, ProductId::new(form.product_id), form.quantity)
        .await
    {
        Ok(()) => {
            Ok(redirect_with_success("/products", "Product added to cart.").into_response())
        }
        Err(CartError::InvalidQuantity) => {
            Ok(redirect_with_error("/products", "Quantity must be at least 1.").into_response())
        }
        Err(CartError::ProductNotFound) => {
            Ok(redirect_with_error("/products", "Product not found.").into_response())
        }
        Err(CartError::InsufficientStock { name, available }) => Ok(redirect_with_error(
            "/products",
            &format!("Not enough stock for {name}. Available: {available}"),
        )
        .into_response()),
        Err(e) => Err(e.into()),
    }
}

/// Remove a line from the cart.
#[instrument(skip(state, _user))]
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Response, AppError> {
    let cart = CartRepository::new(state.pool());

    match cart.remove(CartItemId::new(form.cart_item_id)).await {
        Ok(()) => Ok(redirect_with_success("/cart", "Item removed from cart.").into_response()),
        Err(CartError::NotFound) => {
            Ok(redirect_with_error("/cart", "Item not found in cart.").into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Place an order from the cart contents.
#[instrument(skip(state, user))]
pub async fn checkout(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Response, AppError> {
    let orders = OrderRepository::new(state.pool());

    match orders.place_order(user.id).await {
        Ok(placed) => Ok(redirect_with_success(
            "/orders",
            &format!(
                "Order {} placed successfully. Total: {}",
                placed.order_uid, placed.total
            ),
        )
        .into_response()),
        Err(OrderError::EmptyCart) => {
            Ok(redirect_with_error("/cart", "Cart is empty.").into_response())
        }
        Err(OrderError::InsufficientStock { name, available }) => Ok(redirect_with_error(
            "/cart",
            &format!("Not enough stock for {name}. Available: {available}"),
        )
        .into_response()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::super::redirect_with_error;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    #[test]
    fn test_flash_redirect_encodes_message() {
        let response = redirect_with_error("/cart", "Not enough stock for Widget. Available: 2")
            .into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let location = response
            .headers()
            .get("location")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        assert!(location.starts_with("/cart?error="));
        assert!(!location.contains(' '));
    }
}
