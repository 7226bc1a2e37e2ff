//! Product listing route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use tracing::instrument;

use crate::db::ProductRepository;
use crate::error::AppError;
use crate::middleware::OptionalAuth;
use crate::models::Product;
use crate::state::AppState;

use super::{MessageQuery, Nav};

/// Product display data for templates.
pub struct ProductView {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: String,
    pub stock: i64,
    /// Whether the current viewer gets an add-to-cart form.
    pub purchasable: bool,
}

impl ProductView {
    fn build(product: Product, logged_in: bool) -> Self {
        let purchasable = logged_in && product.in_stock();
        Self {
            id: product.id.as_i64(),
            name: product.name,
            description: product.description,
            price: product.price.to_string(),
            stock: product.stock,
            purchasable,
        }
    }
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsTemplate {
    pub nav: Nav,
    pub error: Option<String>,
    pub success: Option<String>,
    pub products: Vec<ProductView>,
}

/// Display the product listing.
#[instrument(skip(state, user, query))]
pub async fn index(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<MessageQuery>,
) -> Result<ProductsTemplate, AppError> {
    let products = ProductRepository::new(state.pool()).list_all().await?;

    let logged_in = user.is_some();
    let products = products
        .into_iter()
        .map(|p| ProductView::build(p, logged_in))
        .collect();

    Ok(ProductsTemplate {
        nav: Nav::for_user(user.as_ref()),
        error: query.error,
        success: query.success,
        products,
    })
}
