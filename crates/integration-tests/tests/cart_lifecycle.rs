//! Integration tests for the cart lifecycle.
//!
//! These tests run cart operations against a seeded store and check that
//! carts stay isolated, status gates adds, and item deletion cascades.

use shopfront_core::{CartStatus, ItemStatus};
use shopfront_integration_tests::{item_named, register, seeded_store};
use shopfront_storefront::db::{Entity, ItemRepository, StoreError};
use shopfront_storefront::services::CartService;

// =============================================================================
// Active Cart Tests
// =============================================================================

#[test]
fn test_registration_provisions_empty_active_cart() {
    let store = seeded_store();
    let alice = register(&store, "alice");

    let view = CartService::new(&store).list_cart(alice).unwrap();
    assert_eq!(view.cart.status, CartStatus::Active);
    assert_eq!(view.cart.user_id, alice);
    assert_eq!(view.cart.name, "Default Cart");
    assert!(view.lines.is_empty());
}

#[test]
fn test_seeded_admin_has_cart() {
    let store = seeded_store();
    let admin = store
        .read(|t| t.users().find(|u| u.username.as_str() == "admin").map(|u| u.id))
        .unwrap();

    let cart = CartService::new(&store).get_active_cart(admin).unwrap();
    assert_eq!(cart.name, "Admin Cart");
}

#[test]
fn test_add_several_items_lists_in_item_order() {
    let store = seeded_store();
    let alice = register(&store, "alice");
    let carts = CartService::new(&store);

    let mouse = item_named(&store, "Mouse");
    let laptop = item_named(&store, "Laptop");
    carts.add_item(alice, mouse).unwrap();
    carts.add_item(alice, laptop).unwrap();

    let names: Vec<String> = carts
        .list_cart(alice)
        .unwrap()
        .lines
        .into_iter()
        .map(|line| line.item.name)
        .collect();
    assert_eq!(names, vec!["Laptop", "Mouse"]);
}

// =============================================================================
// Item Status Tests
// =============================================================================

#[test]
fn test_status_change_gates_future_adds_only() {
    let store = seeded_store();
    let alice = register(&store, "alice");
    let bob = register(&store, "bob");
    let tablet = item_named(&store, "Tablet");
    let carts = CartService::new(&store);

    carts.add_item(alice, tablet).unwrap();
    ItemRepository::new(&store)
        .set_status(tablet, ItemStatus::from("out_of_stock"))
        .unwrap();

    assert!(matches!(
        carts.add_item(bob, tablet),
        Err(StoreError::ItemUnavailable { .. })
    ));
    assert_eq!(carts.list_cart(alice).unwrap().total_items, 1);

    ItemRepository::new(&store)
        .set_status(tablet, ItemStatus::from("AVAILABLE"))
        .unwrap();
    assert!(carts.add_item(bob, tablet).is_ok());
}

// =============================================================================
// Deletion Cascade Tests
// =============================================================================

#[test]
fn test_deleting_item_removes_it_from_every_cart() {
    let store = seeded_store();
    let alice = register(&store, "alice");
    let bob = register(&store, "bob");
    let webcam = item_named(&store, "Webcam");
    let mouse = item_named(&store, "Mouse");
    let carts = CartService::new(&store);

    carts.add_item(alice, webcam).unwrap();
    carts.add_item(alice, mouse).unwrap();
    carts.add_item(bob, webcam).unwrap();

    let removed = ItemRepository::new(&store).delete(webcam).unwrap();
    assert_eq!(removed, 2);

    assert_eq!(carts.list_cart(alice).unwrap().total_items, 1);
    assert_eq!(carts.list_cart(bob).unwrap().total_items, 0);
    assert_eq!(
        carts.add_item(alice, webcam).unwrap_err(),
        StoreError::NotFound(Entity::Item)
    );
}

#[test]
fn test_remove_then_readd() {
    let store = seeded_store();
    let alice = register(&store, "alice");
    let keyboard = item_named(&store, "Keyboard");
    let carts = CartService::new(&store);

    carts.add_item(alice, keyboard).unwrap();
    carts.remove_item(alice, keyboard).unwrap();
    assert!(carts.add_item(alice, keyboard).is_ok());
    assert_eq!(carts.list_cart(alice).unwrap().total_items, 1);
}
