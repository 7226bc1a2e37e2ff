//! Back office user management.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use tracing::instrument;

use storeroom_core::UserId;

use crate::db::{RepositoryError, UserRepository};
use crate::error::AppError;
use crate::middleware::RequireAdmin;
use crate::models::User;
use crate::routes::{MessageQuery, Nav, redirect_with_error, redirect_with_success};
use crate::state::AppState;

/// User display data for the management table.
pub struct AdminUserView {
    pub id: i64,
    pub username: String,
    pub role: String,
    pub is_active: bool,
    pub created_at: String,
}

impl From<&User> for AdminUserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.as_i64(),
            username: user.username.to_string(),
            role: user.role.to_string(),
            is_active: user.is_active,
            created_at: user.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

/// User management page template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/users.html")]
pub struct AdminUsersTemplate {
    pub nav: Nav,
    pub error: Option<String>,
    pub success: Option<String>,
    pub users: Vec<AdminUserView>,
}

/// Display the user management page.
#[instrument(skip(state, admin, query))]
pub async fn page(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Query(query): Query<MessageQuery>,
) -> Result<AdminUsersTemplate, AppError> {
    let users = UserRepository::new(state.pool()).list_all().await?;

    Ok(AdminUsersTemplate {
        nav: Nav::for_user(Some(&admin)),
        error: query.error,
        success: query.success,
        users: users.iter().map(Into::into).collect(),
    })
}

/// Flip a user's active flag.
#[instrument(skip(state, _admin))]
pub async fn toggle(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    match UserRepository::new(state.pool())
        .toggle_active(UserId::new(id))
        .await
    {
        Ok(user) => Ok(redirect_with_success(
            "/admin/users",
            &format!(
                "User {} status toggled to {}.",
                user.username, user.is_active
            ),
        )
        .into_response()),
        Err(RepositoryError::NotFound) => {
            Ok(redirect_with_error("/admin/users", "User not found.").into_response())
        }
        Err(e) => Err(e.into()),
    }
}
