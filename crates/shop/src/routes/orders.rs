//! Order history route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use tracing::instrument;

use crate::db::OrderRepository;
use crate::error::AppError;
use crate::middleware::RequireAuth;
use crate::models::{OrderLine, OrderWithItems};
use crate::state::AppState;

use super::{MessageQuery, Nav};

/// Order line display data for templates.
pub struct OrderLineView {
    pub name: String,
    pub quantity: i64,
    pub price: String,
}

impl From<&OrderLine> for OrderLineView {
    fn from(line: &OrderLine) -> Self {
        Self {
            name: line.product_name.clone(),
            quantity: line.item.quantity,
            price: line.item.price_at_purchase.to_string(),
        }
    }
}

/// Order display data for templates.
pub struct OrderView {
    pub uid: String,
    pub total: String,
    pub status: String,
    pub placed_at: String,
    pub lines: Vec<OrderLineView>,
}

impl From<&OrderWithItems> for OrderView {
    fn from(order: &OrderWithItems) -> Self {
        Self {
            uid: order.order.order_uid.clone(),
            total: order.order.total.to_string(),
            status: order.order.status.to_string(),
            placed_at: order
                .order
                .created_at
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
            lines: order.lines.iter().map(Into::into).collect(),
        }
    }
}

/// Order history page template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/index.html")]
pub struct OrdersTemplate {
    pub nav: Nav,
    pub error: Option<String>,
    pub success: Option<String>,
    pub orders: Vec<OrderView>,
}

/// Display the current user's orders, newest first.
#[instrument(skip(state, user, query))]
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(query): Query<MessageQuery>,
) -> Result<OrdersTemplate, AppError> {
    let orders = OrderRepository::new(state.pool())
        .list_for_user(user.id)
        .await?;

    Ok(OrdersTemplate {
        nav: Nav::for_user(Some(&user)),
        error: query.error,
        success: query.success,
        orders: orders.iter().map(Into::into).collect(),
    })
}
