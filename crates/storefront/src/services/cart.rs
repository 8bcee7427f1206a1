//! Cart lifecycle service.
//!
//! Every operation addresses the user's current active cart; carts that have
//! been converted into orders are never reachable from here.

use chrono::Utc;

use shopfront_core::{CartId, ItemId, UserId};

use crate::db::{Entity, Store, StoreError, Tables, projections};
use crate::models::{Cart, CartLine, CartLineKey, CartView};

/// Cart lifecycle service.
pub struct CartService<'a> {
    store: &'a Store,
}

impl<'a> CartService<'a> {
    /// Create a new cart service.
    #[must_use]
    pub const fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// The user's current active cart.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the user or their active cart is missing.
    pub fn get_active_cart(&self, user_id: UserId) -> Result<Cart, StoreError> {
        self.store.read(|tables| {
            let cart_id = active_cart_id(tables, user_id)?;
            tables
                .cart(cart_id)
                .cloned()
                .ok_or(StoreError::NotFound(Entity::Cart))
        })
    }

    /// Add an item to the user's active cart.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` if the user, active cart, or item is missing
    /// - `StoreError::ItemUnavailable` if the item's status is not purchasable
    /// - `StoreError::DuplicateLine` if the cart already holds the item
    pub fn add_item(&self, user_id: UserId, item_id: ItemId) -> Result<CartLine, StoreError> {
        let line = self.store.write(|tables| {
            let cart_id = active_cart_id(tables, user_id)?;

            let item = tables
                .item(item_id)
                .ok_or(StoreError::NotFound(Entity::Item))?;
            if !item.status.is_purchasable() {
                return Err(StoreError::ItemUnavailable {
                    item_id,
                    status: item.status.clone(),
                });
            }

            tables
                .insert_line(CartLine {
                    cart_id,
                    item_id,
                    added_at: Utc::now(),
                })
                .cloned()
        })?;

        tracing::debug!(user_id = %user_id, cart_id = %line.cart_id, item_id = %item_id, "item added to cart");
        Ok(line)
    }

    /// Remove one item from the user's active cart.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the user, active cart, or line is missing.
    pub fn remove_item(&self, user_id: UserId, item_id: ItemId) -> Result<(), StoreError> {
        let line = self.store.write(|tables| {
            let cart_id = active_cart_id(tables, user_id)?;
            tables.remove_line(CartLineKey::new(cart_id, item_id))
        })?;

        tracing::debug!(user_id = %user_id, cart_id = %line.cart_id, item_id = %item_id, "item removed from cart");
        Ok(())
    }

    /// Remove every line from the user's active cart.
    ///
    /// Idempotent: clearing an empty cart succeeds and returns 0.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the user or active cart is missing.
    pub fn clear_cart(&self, user_id: UserId) -> Result<usize, StoreError> {
        let (cart_id, removed) = self.store.write(|tables| {
            let cart_id = active_cart_id(tables, user_id)?;
            Ok::<_, StoreError>((cart_id, tables.clear_lines(cart_id)))
        })?;

        tracing::debug!(user_id = %user_id, cart_id = %cart_id, removed, "cart cleared");
        Ok(removed)
    }

    /// The user's active cart with resolved items.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the user or active cart is missing.
    pub fn list_cart(&self, user_id: UserId) -> Result<CartView, StoreError> {
        self.store
            .read(|tables| projections::active_cart_view(tables, user_id))
    }

    /// Any cart by ID, with resolved items (admin view).
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the cart doesn't exist.
    pub fn cart_by_id(&self, cart_id: CartId) -> Result<CartView, StoreError> {
        self.store
            .read(|tables| projections::cart_view(tables, cart_id))
    }

    /// Every cart with resolved items (admin view).
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if a line references a missing item.
    pub fn all_carts(&self) -> Result<Vec<CartView>, StoreError> {
        self.store.read(projections::all_cart_views)
    }
}

/// ID of the user's active cart.
fn active_cart_id(tables: &Tables, user_id: UserId) -> Result<CartId, StoreError> {
    if tables.user(user_id).is_none() {
        return Err(StoreError::NotFound(Entity::User));
    }
    tables
        .active_cart(user_id)
        .map(|cart| cart.id)
        .ok_or(StoreError::NotFound(Entity::Cart))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Barrier;
    use std::thread;

    use shopfront_core::{HashedPassword, ItemStatus, UserRole, Username};

    use super::*;
    use crate::db::{ItemRepository, UserRepository};
    use crate::models::NewItem;

    fn user(store: &Store, name: &str) -> UserId {
        UserRepository::new(store)
            .register(
                Username::parse(name).unwrap(),
                HashedPassword::new("$argon2id$test".to_string()),
                UserRole::Customer,
            )
            .unwrap()
            .id
    }

    fn item(store: &Store, name: &str, status: &str) -> ItemId {
        ItemRepository::new(store)
            .create(NewItem {
                name: name.to_string(),
                status: Some(ItemStatus::from(status)),
                image: None,
            })
            .id
    }

    #[test]
    fn test_add_item_to_active_cart() {
        let store = Store::new();
        let alice = user(&store, "alice");
        let laptop = item(&store, "Laptop", "active");
        let service = CartService::new(&store);

        let line = service.add_item(alice, laptop).unwrap();
        let cart = service.get_active_cart(alice).unwrap();
        assert_eq!(line.cart_id, cart.id);

        let view = service.list_cart(alice).unwrap();
        assert_eq!(view.total_items, 1);
        assert_eq!(view.lines[0].item.name, "Laptop");
    }

    #[test]
    fn test_add_item_accepts_available_status() {
        let store = Store::new();
        let alice = user(&store, "alice");
        let mouse = item(&store, "Mouse", "Available");

        assert!(CartService::new(&store).add_item(alice, mouse).is_ok());
    }

    #[test]
    fn test_add_duplicate_item_rejected() {
        let store = Store::new();
        let alice = user(&store, "alice");
        let laptop = item(&store, "Laptop", "active");
        let service = CartService::new(&store);

        service.add_item(alice, laptop).unwrap();
        let err = service.add_item(alice, laptop).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateLine { item_id, .. } if item_id == laptop));
        assert_eq!(service.list_cart(alice).unwrap().total_items, 1);
    }

    #[test]
    fn test_add_unavailable_item_rejected() {
        let store = Store::new();
        let alice = user(&store, "alice");
        let old = item(&store, "Old Phone", "discontinued");
        let service = CartService::new(&store);

        let err = service.add_item(alice, old).unwrap_err();
        assert!(matches!(err, StoreError::ItemUnavailable { .. }));
        assert_eq!(service.list_cart(alice).unwrap().total_items, 0);
    }

    #[test]
    fn test_add_missing_item_or_user() {
        let store = Store::new();
        let alice = user(&store, "alice");
        let service = CartService::new(&store);

        assert_eq!(
            service.add_item(alice, ItemId::new(999)).unwrap_err(),
            StoreError::NotFound(Entity::Item)
        );
        assert_eq!(
            service.add_item(UserId::new(999), ItemId::new(1)).unwrap_err(),
            StoreError::NotFound(Entity::User)
        );
    }

    #[test]
    fn test_remove_item() {
        let store = Store::new();
        let alice = user(&store, "alice");
        let laptop = item(&store, "Laptop", "active");
        let service = CartService::new(&store);

        service.add_item(alice, laptop).unwrap();
        service.remove_item(alice, laptop).unwrap();
        assert_eq!(service.list_cart(alice).unwrap().total_items, 0);

        assert_eq!(
            service.remove_item(alice, laptop).unwrap_err(),
            StoreError::NotFound(Entity::CartLine)
        );
    }

    #[test]
    fn test_clear_cart_is_idempotent() {
        let store = Store::new();
        let alice = user(&store, "alice");
        let laptop = item(&store, "Laptop", "active");
        let mouse = item(&store, "Mouse", "active");
        let service = CartService::new(&store);

        service.add_item(alice, laptop).unwrap();
        service.add_item(alice, mouse).unwrap();

        assert_eq!(service.clear_cart(alice).unwrap(), 2);
        assert_eq!(service.clear_cart(alice).unwrap(), 0);
        assert_eq!(service.list_cart(alice).unwrap().total_items, 0);
    }

    #[test]
    fn test_carts_are_isolated_per_user() {
        let store = Store::new();
        let alice = user(&store, "alice");
        let bob = user(&store, "bob");
        let laptop = item(&store, "Laptop", "active");
        let service = CartService::new(&store);

        service.add_item(alice, laptop).unwrap();
        service.add_item(bob, laptop).unwrap();
        service.clear_cart(alice).unwrap();

        assert_eq!(service.list_cart(alice).unwrap().total_items, 0);
        assert_eq!(service.list_cart(bob).unwrap().total_items, 1);
        assert_eq!(service.all_carts().unwrap().len(), 2);
    }

    #[test]
    fn test_concurrent_duplicate_adds_produce_one_line() {
        const THREADS: usize = 8;

        let store = Store::new();
        let alice = user(&store, "alice");
        let laptop = item(&store, "Laptop", "active");
        let barrier = Barrier::new(THREADS);

        let results: Vec<Result<CartLine, StoreError>> = thread::scope(|scope| {
            let handles: Vec<_> = (0..THREADS)
                .map(|_| {
                    scope.spawn(|| {
                        barrier.wait();
                        CartService::new(&store).add_item(alice, laptop)
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert_eq!(
            results
                .iter()
                .filter(|r| matches!(r, Err(StoreError::DuplicateLine { .. })))
                .count(),
            THREADS - 1
        );
        assert_eq!(CartService::new(&store).list_cart(alice).unwrap().total_items, 1);
    }
}
