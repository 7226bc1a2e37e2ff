//! Integration tests for cart merging, stock read-checks, and removal.

use storeroom_core::{CartItemId, ProductId};
use storeroom_integration_tests::TestStore;
use storeroom_shop::db::CartError;

#[tokio::test]
async fn repeat_add_merges_into_a_single_line() {
    let store = TestStore::new().await;
    let user = store.register_user("alice").await;
    let product = store.add_product("Widget", "10.00", 5).await;

    store
        .cart()
        .add_item(user.id, product.id, 2)
        .await
        .expect("first add");
    store
        .cart()
        .add_item(user.id, product.id, 1)
        .await
        .expect("second add");

    let lines = store.cart().list_for_user(user.id).await.expect("list cart");
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].item.quantity, 3);
    assert_eq!(lines[0].product.id, product.id);
}

#[tokio::test]
async fn add_beyond_stock_is_rejected() {
    let store = TestStore::new().await;
    let user = store.register_user("alice").await;
    let product = store.add_product("Widget", "10.00", 5).await;

    let result = store.cart().add_item(user.id, product.id, 6).await;
    assert!(matches!(
        result,
        Err(CartError::InsufficientStock { available: 5, .. })
    ));

    let lines = store.cart().list_for_user(user.id).await.expect("list cart");
    assert!(lines.is_empty());
}

#[tokio::test]
async fn merge_beyond_stock_is_rejected_and_line_unchanged() {
    let store = TestStore::new().await;
    let user = store.register_user("alice").await;
    let product = store.add_product("Widget", "10.00", 5).await;

    store
        .cart()
        .add_item(user.id, product.id, 3)
        .await
        .expect("first add");

    let result = store.cart().add_item(user.id, product.id, 3).await;
    assert!(matches!(
        result,
        Err(CartError::InsufficientStock { available: 5, .. })
    ));

    let lines = store.cart().list_for_user(user.id).await.expect("list cart");
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].item.quantity, 3);
}

#[tokio::test]
async fn add_does_not_reserve_stock() {
    let store = TestStore::new().await;
    let user = store.register_user("alice").await;
    let product = store.add_product("Widget", "10.00", 5).await;

    store
        .cart()
        .add_item(user.id, product.id, 5)
        .await
        .expect("add full stock");

    let reloaded = store
        .products()
        .get(product.id)
        .await
        .expect("get product")
        .expect("product exists");
    assert_eq!(reloaded.stock, 5);
}

#[tokio::test]
async fn zero_quantity_is_rejected() {
    let store = TestStore::new().await;
    let user = store.register_user("alice").await;
    let product = store.add_product("Widget", "10.00", 5).await;

    let result = store.cart().add_item(user.id, product.id, 0).await;
    assert!(matches!(result, Err(CartError::InvalidQuantity)));
}

#[tokio::test]
async fn unknown_product_is_rejected() {
    let store = TestStore::new().await;
    let user = store.register_user("alice").await;

    let result = store
        .cart()
        .add_item(user.id, ProductId::new(9999), 1)
        .await;
    assert!(matches!(result, Err(CartError::ProductNotFound)));
}

#[tokio::test]
async fn cart_lines_resolve_products_and_subtotals() {
    let store = TestStore::new().await;
    let user = store.register_user("alice").await;
    let product = store.add_product("Widget", "10.00", 5).await;

    store
        .cart()
        .add_item(user.id, product.id, 3)
        .await
        .expect("add to cart");

    let lines = store.cart().list_for_user(user.id).await.expect("list cart");
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].product.name, "Widget");
    assert_eq!(lines[0].subtotal().as_cents(), 3000);
}

#[tokio::test]
async fn remove_deletes_the_line() {
    let store = TestStore::new().await;
    let user = store.register_user("alice").await;
    let product = store.add_product("Widget", "10.00", 5).await;

    store
        .cart()
        .add_item(user.id, product.id, 2)
        .await
        .expect("add to cart");

    let lines = store.cart().list_for_user(user.id).await.expect("list cart");
    store
        .cart()
        .remove(lines[0].item.id)
        .await
        .expect("remove line");

    let lines = store.cart().list_for_user(user.id).await.expect("list cart");
    assert!(lines.is_empty());
}

#[tokio::test]
async fn remove_missing_line_is_not_found() {
    let store = TestStore::new().await;

    let result = store.cart().remove(CartItemId::new(9999)).await;
    assert!(matches!(result, Err(CartError::NotFound)));
}
