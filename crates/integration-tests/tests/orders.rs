//! Integration tests for the order placement transaction and its
//! properties: atomicity, conservation, price snapshotting, and the stock
//! floor under competing carts.

use storeroom_core::{OrderId, OrderStatus, Price};
use storeroom_integration_tests::TestStore;
use storeroom_shop::db::OrderError;

#[tokio::test]
async fn placement_walkthrough() {
    let store = TestStore::new().await;
    let user = store.register_user("alice").await;
    let product = store.add_product("Widget", "10.00", 5).await;

    store
        .cart()
        .add_item(user.id, product.id, 3)
        .await
        .expect("add to cart");

    let placed = store.orders().place_order(user.id).await.expect("place order");
    assert!(!placed.order_uid.is_empty());
    assert_eq!(placed.total, Price::from_cents(3000));

    // Stock was decremented and the cart drained.
    let reloaded = store
        .products()
        .get(product.id)
        .await
        .expect("get product")
        .expect("product exists");
    assert_eq!(reloaded.stock, 2);

    let cart = store.cart().list_for_user(user.id).await.expect("list cart");
    assert!(cart.is_empty());

    // The order is visible with its snapshot.
    let orders = store
        .orders()
        .list_for_user(user.id)
        .await
        .expect("list orders");
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].order.order_uid, placed.order_uid);
    assert_eq!(orders[0].order.status, OrderStatus::Pending);
    assert_eq!(orders[0].lines.len(), 1);
    assert_eq!(orders[0].lines[0].item.quantity, 3);
    assert_eq!(
        orders[0].lines[0].item.price_at_purchase,
        Price::from_cents(1000)
    );
    assert_eq!(orders[0].lines[0].product_name, "Widget");

    // A second placement on the now-empty cart is rejected.
    let result = store.orders().place_order(user.id).await;
    assert!(matches!(result, Err(OrderError::EmptyCart)));
}

#[tokio::test]
async fn failed_placement_changes_nothing() {
    let store = TestStore::new().await;
    let user = store.register_user("alice").await;
    let plenty = store.add_product("Widget", "10.00", 5).await;
    let scarce = store.add_product("Gadget", "4.50", 2).await;

    store
        .cart()
        .add_item(user.id, plenty.id, 2)
        .await
        .expect("add widget");
    store
        .cart()
        .add_item(user.id, scarce.id, 2)
        .await
        .expect("add gadget");

    // Stock shifts under the cart between add time and checkout.
    store
        .products()
        .adjust_stock(scarce.id, -1)
        .await
        .expect("shrink gadget stock");

    let result = store.orders().place_order(user.id).await;
    match result {
        Err(OrderError::InsufficientStock { name, available }) => {
            assert_eq!(name, "Gadget");
            assert_eq!(available, 1);
        }
        other => panic!("expected InsufficientStock, got {other:?}"),
    }

    // No order, no stock mutation, no cart deletion.
    let orders = store
        .orders()
        .list_for_user(user.id)
        .await
        .expect("list orders");
    assert!(orders.is_empty());

    let widget = store
        .products()
        .get(plenty.id)
        .await
        .expect("get widget")
        .expect("widget exists");
    assert_eq!(widget.stock, 5);

    let gadget = store
        .products()
        .get(scarce.id)
        .await
        .expect("get gadget")
        .expect("gadget exists");
    assert_eq!(gadget.stock, 1);

    let cart = store.cart().list_for_user(user.id).await.expect("list cart");
    assert_eq!(cart.len(), 2);
}

#[tokio::test]
async fn competing_carts_cannot_oversubscribe_stock() {
    let store = TestStore::new().await;
    let alice = store.register_user("alice").await;
    let bob = store.register_user("bob").await;
    let product = store.add_product("Widget", "10.00", 5).await;

    // Both carts pass the add-time read-check; stock is not reserved.
    store
        .cart()
        .add_item(alice.id, product.id, 3)
        .await
        .expect("alice adds");
    store
        .cart()
        .add_item(bob.id, product.id, 3)
        .await
        .expect("bob adds");

    store
        .orders()
        .place_order(alice.id)
        .await
        .expect("first placement wins");

    let result = store.orders().place_order(bob.id).await;
    match result {
        Err(OrderError::InsufficientStock { name, available }) => {
            assert_eq!(name, "Widget");
            assert_eq!(available, 2);
        }
        other => panic!("expected InsufficientStock, got {other:?}"),
    }

    // Stock landed at 2, not negative, and bob's cart is intact.
    let reloaded = store
        .products()
        .get(product.id)
        .await
        .expect("get product")
        .expect("product exists");
    assert_eq!(reloaded.stock, 2);

    let bob_cart = store.cart().list_for_user(bob.id).await.expect("bob cart");
    assert_eq!(bob_cart.len(), 1);
}

#[tokio::test]
async fn price_at_purchase_survives_repricing() {
    let store = TestStore::new().await;
    let user = store.register_user("alice").await;
    let product = store.add_product("Widget", "10.00", 5).await;

    store
        .cart()
        .add_item(user.id, product.id, 3)
        .await
        .expect("add to cart");
    let placed = store.orders().place_order(user.id).await.expect("place order");

    store
        .products()
        .update_price(product.id, Price::parse("99.99").expect("valid price"))
        .await
        .expect("reprice");

    let orders = store
        .orders()
        .list_for_user(user.id)
        .await
        .expect("list orders");
    assert_eq!(
        orders[0].lines[0].item.price_at_purchase,
        Price::from_cents(1000)
    );
    assert_eq!(orders[0].order.total, placed.total);

    // The catalog itself did change.
    let reloaded = store
        .products()
        .get(product.id)
        .await
        .expect("get product")
        .expect("product exists");
    assert_eq!(reloaded.price, Price::from_cents(9999));
}

#[tokio::test]
async fn total_is_the_sum_of_snapshotted_lines() {
    let store = TestStore::new().await;
    let user = store.register_user("alice").await;
    let widget = store.add_product("Widget", "10.00", 5).await;
    let gadget = store.add_product("Gadget", "4.50", 4).await;

    store
        .cart()
        .add_item(user.id, widget.id, 2)
        .await
        .expect("add widget");
    store
        .cart()
        .add_item(user.id, gadget.id, 3)
        .await
        .expect("add gadget");

    let placed = store.orders().place_order(user.id).await.expect("place order");
    assert_eq!(placed.total, Price::from_cents(2 * 1000 + 3 * 450));

    let orders = store
        .orders()
        .list_for_user(user.id)
        .await
        .expect("list orders");
    let computed: i64 = orders[0]
        .lines
        .iter()
        .map(|l| l.item.price_at_purchase.as_cents() * l.item.quantity)
        .sum();
    assert_eq!(orders[0].order.total.as_cents(), computed);

    // Conservation: each consumed line decremented its product.
    let widget = store
        .products()
        .get(widget.id)
        .await
        .expect("get widget")
        .expect("widget exists");
    assert_eq!(widget.stock, 3);
    let gadget = store
        .products()
        .get(gadget.id)
        .await
        .expect("get gadget")
        .expect("gadget exists");
    assert_eq!(gadget.stock, 1);
}

#[tokio::test]
async fn status_transitions_are_unrestricted() {
    let store = TestStore::new().await;
    let user = store.register_user("alice").await;
    let product = store.add_product("Widget", "10.00", 5).await;

    store
        .cart()
        .add_item(user.id, product.id, 1)
        .await
        .expect("add to cart");
    store.orders().place_order(user.id).await.expect("place order");

    let orders = store
        .orders()
        .list_for_user(user.id)
        .await
        .expect("list orders");
    let order_id = orders[0].order.id;

    // Forward, backward, and sideways - no state machine.
    for status in [
        OrderStatus::Delivered,
        OrderStatus::Pending,
        OrderStatus::Cancelled,
        OrderStatus::Processing,
    ] {
        store
            .orders()
            .update_status(order_id, status)
            .await
            .expect("update status");

        let orders = store
            .orders()
            .list_for_user(user.id)
            .await
            .expect("list orders");
        assert_eq!(orders[0].order.status, status);
    }
}

#[tokio::test]
async fn update_status_of_missing_order_is_not_found() {
    let store = TestStore::new().await;

    let result = store
        .orders()
        .update_status(OrderId::new(9999), OrderStatus::Shipped)
        .await;
    assert!(matches!(result, Err(OrderError::NotFound)));
}

#[tokio::test]
async fn orders_list_newest_first() {
    let store = TestStore::new().await;
    let user = store.register_user("alice").await;
    let product = store.add_product("Widget", "10.00", 10).await;

    store
        .cart()
        .add_item(user.id, product.id, 1)
        .await
        .expect("first add");
    let first = store.orders().place_order(user.id).await.expect("first order");

    store
        .cart()
        .add_item(user.id, product.id, 2)
        .await
        .expect("second add");
    let second = store.orders().place_order(user.id).await.expect("second order");

    let orders = store
        .orders()
        .list_for_user(user.id)
        .await
        .expect("list orders");
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0].order.order_uid, second.order_uid);
    assert_eq!(orders[1].order.order_uid, first.order_uid);
}

#[tokio::test]
async fn admin_listing_resolves_usernames() {
    let store = TestStore::new().await;
    let alice = store.register_user("alice").await;
    let bob = store.register_user("bob").await;
    let product = store.add_product("Widget", "10.00", 10).await;

    store
        .cart()
        .add_item(alice.id, product.id, 1)
        .await
        .expect("alice adds");
    store.orders().place_order(alice.id).await.expect("alice orders");

    store
        .cart()
        .add_item(bob.id, product.id, 2)
        .await
        .expect("bob adds");
    store.orders().place_order(bob.id).await.expect("bob orders");

    let all = store.orders().list_all().await.expect("list all orders");
    assert_eq!(all.len(), 2);
    // Newest first: bob's order leads.
    assert_eq!(all[0].username, "bob");
    assert_eq!(all[1].username, "alice");
    assert_eq!(all[0].lines.len(), 1);

    let mine = store
        .orders()
        .list_for_user(alice.id)
        .await
        .expect("alice orders");
    assert_eq!(mine.len(), 1);
}

#[tokio::test]
async fn order_uids_are_unique_across_orders() {
    let store = TestStore::new().await;
    let user = store.register_user("alice").await;
    let product = store.add_product("Widget", "10.00", 10).await;

    let mut uids = Vec::new();
    for quantity in [1, 2, 3] {
        store
            .cart()
            .add_item(user.id, product.id, quantity)
            .await
            .expect("add to cart");
        let placed = store.orders().place_order(user.id).await.expect("place order");
        uids.push(placed.order_uid);
    }

    uids.sort();
    uids.dedup();
    assert_eq!(uids.len(), 3);
}
