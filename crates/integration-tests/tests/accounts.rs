//! Integration tests for registration, login, and activation toggling.

use storeroom_core::{Role, UserId};
use storeroom_integration_tests::{TEST_PASSWORD, TestStore};
use storeroom_shop::db::RepositoryError;
use storeroom_shop::services::auth::AuthError;

#[tokio::test]
async fn registration_then_duplicate_username_rejected() {
    let store = TestStore::new().await;

    store.register_user("alice").await;

    let result = store.auth().register("alice", "different-pw", Role::User).await;
    assert!(matches!(result, Err(AuthError::DuplicateUsername)));
}

#[tokio::test]
async fn login_succeeds_with_correct_password() {
    let store = TestStore::new().await;
    let registered = store.register_user("alice").await;

    let user = store
        .auth()
        .login("alice", TEST_PASSWORD)
        .await
        .expect("login with correct password");

    assert_eq!(user.id, registered.id);
    assert_eq!(user.role, Role::User);
    assert!(user.is_active);
}

#[tokio::test]
async fn login_with_wrong_password_is_invalid_credentials() {
    let store = TestStore::new().await;
    store.register_user("alice").await;

    let result = store.auth().login("alice", "wrong-password").await;
    assert!(matches!(result, Err(AuthError::InvalidCredentials)));
}

#[tokio::test]
async fn login_with_unknown_user_is_invalid_credentials() {
    let store = TestStore::new().await;

    let result = store.auth().login("nobody", TEST_PASSWORD).await;
    assert!(matches!(result, Err(AuthError::InvalidCredentials)));
}

#[tokio::test]
async fn deactivated_account_cannot_login_until_reactivated() {
    let store = TestStore::new().await;
    let user = store.register_user("alice").await;

    let toggled = store
        .users()
        .toggle_active(user.id)
        .await
        .expect("toggle existing user");
    assert!(!toggled.is_active);

    let result = store.auth().login("alice", TEST_PASSWORD).await;
    assert!(matches!(result, Err(AuthError::AccountInactive)));

    store
        .users()
        .toggle_active(user.id)
        .await
        .expect("toggle back");

    store
        .auth()
        .login("alice", TEST_PASSWORD)
        .await
        .expect("login after reactivation");
}

#[tokio::test]
async fn toggle_missing_user_is_not_found() {
    let store = TestStore::new().await;

    let result = store.users().toggle_active(UserId::new(9999)).await;
    assert!(matches!(result, Err(RepositoryError::NotFound)));
}

#[tokio::test]
async fn weak_password_rejected_at_registration() {
    let store = TestStore::new().await;

    let result = store.auth().register("bob", "short", Role::User).await;
    assert!(matches!(result, Err(AuthError::WeakPassword(_))));
}

#[tokio::test]
async fn invalid_username_rejected_at_registration() {
    let store = TestStore::new().await;

    let result = store
        .auth()
        .register("not a username", TEST_PASSWORD, Role::User)
        .await;
    assert!(matches!(result, Err(AuthError::InvalidUsername(_))));
}

#[tokio::test]
async fn list_users_returns_all_accounts() {
    let store = TestStore::new().await;
    store.register_user("alice").await;
    store.register_user("bob").await;
    store
        .auth()
        .register("root", TEST_PASSWORD, Role::Admin)
        .await
        .expect("register admin");

    let users = store.users().list_all().await.expect("list users");
    assert_eq!(users.len(), 3);

    let admin = users
        .iter()
        .find(|u| u.username.as_str() == "root")
        .expect("admin present");
    assert_eq!(admin.role, Role::Admin);
}
