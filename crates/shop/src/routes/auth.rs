//! Authentication route handlers.
//!
//! Login, registration and logout. Outcomes surface as flash messages;
//! successful logins land on the catalog (or the back office for admins).

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use storeroom_core::Role;

use crate::error::AppError;
use crate::middleware::{OptionalAuth, clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;

use super::{MessageQuery, Nav, redirect_with_error, redirect_with_success};

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
    pub password_confirm: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub nav: Nav,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub nav: Nav,
    pub error: Option<String>,
    pub success: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the login page.
pub async fn login_page(
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<MessageQuery>,
) -> impl IntoResponse {
    LoginTemplate {
        nav: Nav::for_user(user.as_ref()),
        error: query.error,
        success: query.success,
    }
}

/// Handle login form submission.
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let auth = AuthService::new(state.pool());

    match auth.login(&form.username, &form.password).await {
        Ok(user) => {
            let current = CurrentUser::from(&user);
            if let Err(e) = set_current_user(&session, &current).await {
                tracing::error!("Failed to set session: {e}");
                return Ok(redirect_with_error("/auth/login", "Session error, please try again.")
                    .into_response());
            }

            let destination = if user.role.is_admin() {
                "/admin/orders"
            } else {
                "/products"
            };
            Ok(Redirect::to(destination).into_response())
        }
        Err(AuthError::InvalidCredentials) => {
            tracing::warn!(username = %form.username, "login failed");
            Ok(redirect_with_error("/auth/login", "Invalid username or password.").into_response())
        }
        Err(AuthError::AccountInactive) => {
            Ok(redirect_with_error("/auth/login", "Account is inactive.").into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Display the registration page.
pub async fn register_page(
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<MessageQuery>,
) -> impl IntoResponse {
    RegisterTemplate {
        nav: Nav::for_user(user.as_ref()),
        error: query.error,
        success: query.success,
    }
}

/// Handle registration form submission.
///
/// New accounts always get the `user` role; admins are created via the CLI.
#[instrument(skip(state, form))]
pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Result<Response, AppError> {
    if form.password != form.password_confirm {
        return Ok(redirect_with_error("/auth/register", "Passwords do not match.").into_response());
    }

    let auth = AuthService::new(state.pool());

    match auth.register(&form.username, &form.password, Role::User).await {
        Ok(_) => Ok(redirect_with_success(
            "/auth/login",
            "Registration successful. You can now log in.",
        )
        .into_response()),
        Err(AuthError::DuplicateUsername) => {
            Ok(redirect_with_error("/auth/register", "Username already exists.").into_response())
        }
        Err(AuthError::InvalidUsername(e)) => {
            Ok(redirect_with_error("/auth/register", &e.to_string()).into_response())
        }
        Err(AuthError::WeakPassword(message)) => {
            Ok(redirect_with_error("/auth/register", &message).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Handle logout.
pub async fn logout(session: Session) -> Result<Redirect, AppError> {
    clear_current_user(&session)
        .await
        .map_err(|e| AppError::Internal(format!("failed to clear session: {e}")))?;

    Ok(Redirect::to("/auth/login"))
}
