//! User domain types.

use chrono::{DateTime, Utc};

use storeroom_core::{Role, UserId, Username};

/// A store account (domain type).
///
/// The password digest is deliberately not part of this type; it only
/// surfaces through [`crate::db::UserRepository::get_with_password_hash`]
/// for verification during login.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Login name, unique across the store.
    pub username: Username,
    /// Role assigned at registration; immutable afterwards.
    pub role: Role,
    /// Inactive accounts cannot log in. Toggled by admins, never deleted.
    pub is_active: bool,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}
