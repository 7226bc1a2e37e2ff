//! Admin account management commands.
//!
//! Registration through the web UI always creates regular users; admin
//! accounts are bootstrapped here.

use storeroom_core::Role;
use storeroom_shop::services::auth::AuthService;

/// Create a new admin account.
///
/// # Errors
///
/// Returns an error if the username is taken or invalid, the password is
/// too weak, or the database is unreachable.
pub async fn create_account(username: &str, password: &str) -> Result<(), Box<dyn std::error::Error>> {
    let pool = super::connect().await?;

    let auth = AuthService::new(&pool);
    let user = auth.register(username, password, Role::Admin).await?;

    tracing::info!(user_id = %user.id, username = %user.username, "Admin account created");
    Ok(())
}
