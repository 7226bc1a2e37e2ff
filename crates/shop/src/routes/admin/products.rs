//! Back office catalog management.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;

use storeroom_core::{Price, ProductId};

use crate::db::{ProductRepository, RepositoryError};
use crate::error::AppError;
use crate::middleware::RequireAdmin;
use crate::models::Product;
use crate::routes::{MessageQuery, Nav, redirect_with_error, redirect_with_success};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Add product form data.
#[derive(Debug, Deserialize)]
pub struct AddProductForm {
    pub name: String,
    pub description: String,
    pub price: String,
    pub stock: i64,
}

/// Stock adjustment form data.
#[derive(Debug, Deserialize)]
pub struct AdjustStockForm {
    pub delta: i64,
}

/// Price change form data.
#[derive(Debug, Deserialize)]
pub struct UpdatePriceForm {
    pub price: String,
}

// =============================================================================
// Views & Templates
// =============================================================================

/// Product display data for the management table.
pub struct AdminProductView {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: String,
    pub stock: i64,
    pub updated_at: String,
}

impl From<&Product> for AdminProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.as_i64(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price.to_string(),
            stock: product.stock,
            updated_at: product.updated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

/// Catalog management page template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/products.html")]
pub struct AdminProductsTemplate {
    pub nav: Nav,
    pub error: Option<String>,
    pub success: Option<String>,
    pub products: Vec<AdminProductView>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the catalog management page.
#[instrument(skip(state, admin, query))]
pub async fn page(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Query(query): Query<MessageQuery>,
) -> Result<AdminProductsTemplate, AppError> {
    let products = ProductRepository::new(state.pool()).list_all().await?;

    Ok(AdminProductsTemplate {
        nav: Nav::for_user(Some(&admin)),
        error: query.error,
        success: query.success,
        products: products.iter().map(Into::into).collect(),
    })
}

/// Add a product to the catalog.
#[instrument(skip(state, _admin, form))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Form(form): Form<AddProductForm>,
) -> Result<Response, AppError> {
    let name = form.name.trim();
    if name.is_empty() {
        return Ok(redirect_with_error("/admin/products", "Product name is required.")
            .into_response());
    }

    let price = match Price::parse(&form.price) {
        Ok(price) => price,
        Err(e) => {
            return Ok(redirect_with_error("/admin/products", &e.to_string()).into_response());
        }
    };

    if form.stock < 0 {
        return Ok(
            redirect_with_error("/admin/products", "Stock cannot be negative.").into_response(),
        );
    }

    ProductRepository::new(state.pool())
        .create(name, form.description.trim(), price, form.stock)
        .await?;

    Ok(redirect_with_success("/admin/products", "Product added successfully.").into_response())
}

/// Apply a stock delta to a product.
///
/// The non-negativity of the result is enforced here, at the call site;
/// the repository primitive applies whatever delta it is given.
#[instrument(skip(state, _admin))]
pub async fn adjust_stock(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i64>,
    Form(form): Form<AdjustStockForm>,
) -> Result<Response, AppError> {
    let products = ProductRepository::new(state.pool());
    let product_id = ProductId::new(id);

    let Some(product) = products.get(product_id).await? else {
        return Ok(redirect_with_error("/admin/products", "Product not found.").into_response());
    };

    if product.stock + form.delta < 0 {
        return Ok(redirect_with_error(
            "/admin/products",
            &format!(
                "Cannot remove {} units; only {} in stock.",
                -form.delta, product.stock
            ),
        )
        .into_response());
    }

    match products.adjust_stock(product_id, form.delta).await {
        Ok(()) => Ok(redirect_with_success(
            "/admin/products",
            &format!("Stock for {} adjusted by {}.", product.name, form.delta),
        )
        .into_response()),
        Err(RepositoryError::NotFound) => {
            Ok(redirect_with_error("/admin/products", "Product not found.").into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Change a product's list price.
///
/// Placed orders keep their snapshotted price-at-purchase.
#[instrument(skip(state, _admin, form))]
pub async fn update_price(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i64>,
    Form(form): Form<UpdatePriceForm>,
) -> Result<Response, AppError> {
    let price = match Price::parse(&form.price) {
        Ok(price) => price,
        Err(e) => {
            return Ok(redirect_with_error("/admin/products", &e.to_string()).into_response());
        }
    };

    match ProductRepository::new(state.pool())
        .update_price(ProductId::new(id), price)
        .await
    {
        Ok(()) => Ok(
            redirect_with_success("/admin/products", &format!("Price updated to {price}."))
                .into_response(),
        ),
        Err(RepositoryError::NotFound) => {
            Ok(redirect_with_error("/admin/products", "Product not found.").into_response())
        }
        Err(e) => Err(e.into()),
    }
}
