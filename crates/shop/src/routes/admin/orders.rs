//! Back office order management.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;

use storeroom_core::{OrderId, OrderStatus};

use crate::db::{OrderError, OrderRepository};
use crate::error::AppError;
use crate::middleware::RequireAdmin;
use crate::models::AdminOrder;
use crate::routes::orders::OrderLineView;
use crate::routes::{MessageQuery, Nav, redirect_with_error, redirect_with_success};
use crate::state::AppState;

/// Status change form data.
#[derive(Debug, Deserialize)]
pub struct SetStatusForm {
    pub status: String,
}

/// One option of the status select.
pub struct StatusOption {
    pub value: &'static str,
    pub selected: bool,
}

/// Order display data for the administrative table.
pub struct AdminOrderView {
    pub id: i64,
    pub uid: String,
    pub username: String,
    pub total: String,
    pub status: String,
    pub placed_at: String,
    pub lines: Vec<OrderLineView>,
    pub status_options: Vec<StatusOption>,
}

impl From<&AdminOrder> for AdminOrderView {
    fn from(order: &AdminOrder) -> Self {
        let status_options = OrderStatus::ALL
            .iter()
            .map(|s| StatusOption {
                value: s.as_str(),
                selected: *s == order.order.status,
            })
            .collect();

        Self {
            id: order.order.id.as_i64(),
            uid: order.order.order_uid.clone(),
            username: order.username.clone(),
            total: order.order.total.to_string(),
            status: order.order.status.to_string(),
            placed_at: order
                .order
                .created_at
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
            lines: order.lines.iter().map(Into::into).collect(),
            status_options,
        }
    }
}

/// Order management page template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/orders.html")]
pub struct AdminOrdersTemplate {
    pub nav: Nav,
    pub error: Option<String>,
    pub success: Option<String>,
    pub orders: Vec<AdminOrderView>,
}

/// Display every order in the store, newest first.
#[instrument(skip(state, admin, query))]
pub async fn page(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Query(query): Query<MessageQuery>,
) -> Result<AdminOrdersTemplate, AppError> {
    let orders = OrderRepository::new(state.pool()).list_all().await?;

    Ok(AdminOrdersTemplate {
        nav: Nav::for_user(Some(&admin)),
        error: query.error,
        success: query.success,
        orders: orders.iter().map(Into::into).collect(),
    })
}

/// Set an order's fulfillment status.
///
/// Any status may follow any other; no transition rules are enforced.
#[instrument(skip(state, _admin))]
pub async fn set_status(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i64>,
    Form(form): Form<SetStatusForm>,
) -> Result<Response, AppError> {
    let Ok(status) = form.status.parse::<OrderStatus>() else {
        return Ok(redirect_with_error("/admin/orders", "Unknown order status.").into_response());
    };

    match OrderRepository::new(state.pool())
        .update_status(OrderId::new(id), status)
        .await
    {
        Ok(()) => Ok(redirect_with_success(
            "/admin/orders",
            &format!("Order status updated to {status}."),
        )
        .into_response()),
        Err(OrderError::NotFound) => {
            Ok(redirect_with_error("/admin/orders", "Order not found.").into_response())
        }
        Err(e) => Err(e.into()),
    }
}
