//! Keyed collections and their primitives.
//!
//! `Tables` is only reachable through [`super::Store::read`] and
//! [`super::Store::write`]. Its methods never lock; they enforce referential
//! integrity (a line always points at an existing cart and item) and key
//! uniqueness, and leave business rules to the services.

use std::collections::{BTreeMap, HashMap};

use shopfront_core::{CartId, ItemId, OrderId, UserId, Username};

use super::{Entity, IdSequence, StoreError};
use crate::models::{Cart, CartLine, CartLineKey, Item, Order, User};

/// Every collection plus the ID sequence.
#[derive(Debug, Default)]
pub struct Tables {
    sequence: IdSequence,
    users: BTreeMap<UserId, User>,
    usernames: HashMap<Username, UserId>,
    items: BTreeMap<ItemId, Item>,
    carts: BTreeMap<CartId, Cart>,
    cart_lines: BTreeMap<CartLineKey, CartLine>,
    orders: BTreeMap<OrderId, Order>,
}

impl Tables {
    /// Issue the next entity ID.
    pub const fn next_id(&mut self) -> u64 {
        self.sequence.next_id()
    }

    /// The ID the next call to [`Self::next_id`] will return.
    #[must_use]
    pub const fn peek_id(&self) -> u64 {
        self.sequence.peek()
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// Insert a user.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::AlreadyExists` if the username or ID is taken.
    pub fn insert_user(&mut self, user: User) -> Result<(), StoreError> {
        if self.usernames.contains_key(&user.username) || self.users.contains_key(&user.id) {
            return Err(StoreError::AlreadyExists(format!(
                "username '{}'",
                user.username
            )));
        }
        self.usernames.insert(user.username.clone(), user.id);
        self.users.insert(user.id, user);
        Ok(())
    }

    #[must_use]
    pub fn user(&self, id: UserId) -> Option<&User> {
        self.users.get(&id)
    }

    pub fn user_mut(&mut self, id: UserId) -> Option<&mut User> {
        self.users.get_mut(&id)
    }

    #[must_use]
    pub fn user_by_username(&self, username: &Username) -> Option<&User> {
        self.usernames
            .get(username)
            .and_then(|id| self.users.get(id))
    }

    /// All users in ID order.
    pub fn users(&self) -> impl Iterator<Item = &User> {
        self.users.values()
    }

    #[must_use]
    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    // =========================================================================
    // Items
    // =========================================================================

    /// Insert or replace an item.
    pub fn insert_item(&mut self, item: Item) {
        self.items.insert(item.id, item);
    }

    #[must_use]
    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.get(&id)
    }

    pub fn item_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        self.items.get_mut(&id)
    }

    /// Remove an item and every cart line that references it.
    ///
    /// Order snapshots hold their own copy of the item and are unaffected.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the item does not exist.
    pub fn remove_item(&mut self, id: ItemId) -> Result<(Item, usize), StoreError> {
        let item = self
            .items
            .remove(&id)
            .ok_or(StoreError::NotFound(Entity::Item))?;
        let removed_lines = self.remove_lines_for_item(id);
        Ok((item, removed_lines))
    }

    /// All items in ID order.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    // =========================================================================
    // Carts
    // =========================================================================

    /// Insert a cart.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the owning user does not exist, or
    /// `StoreError::AlreadyExists` if the ID is taken.
    pub fn insert_cart(&mut self, cart: Cart) -> Result<(), StoreError> {
        self.check_cart_insert(&cart)?;
        self.carts.insert(cart.id, cart);
        Ok(())
    }

    /// Check that [`Self::insert_cart`] would accept `cart`, without writing.
    ///
    /// # Errors
    ///
    /// Same as [`Self::insert_cart`].
    pub fn check_cart_insert(&self, cart: &Cart) -> Result<(), StoreError> {
        if !self.users.contains_key(&cart.user_id) {
            return Err(StoreError::NotFound(Entity::User));
        }
        if self.carts.contains_key(&cart.id) {
            return Err(StoreError::AlreadyExists(format!("cart {}", cart.id)));
        }
        Ok(())
    }

    #[must_use]
    pub fn cart(&self, id: CartId) -> Option<&Cart> {
        self.carts.get(&id)
    }

    pub fn cart_mut(&mut self, id: CartId) -> Option<&mut Cart> {
        self.carts.get_mut(&id)
    }

    /// The cart the user currently points at, if it exists and is active.
    #[must_use]
    pub fn active_cart(&self, user_id: UserId) -> Option<&Cart> {
        let user = self.users.get(&user_id)?;
        self.carts
            .get(&user.cart_id)
            .filter(|cart| cart.user_id == user_id && cart.status.is_active())
    }

    /// All carts in ID order.
    pub fn carts(&self) -> impl Iterator<Item = &Cart> {
        self.carts.values()
    }

    #[must_use]
    pub fn cart_count(&self) -> usize {
        self.carts.len()
    }

    // =========================================================================
    // Cart lines
    // =========================================================================

    /// Insert a cart line.
    ///
    /// The duplicate check and the insert happen on the same borrow, so under
    /// the write lock no two identical lines can ever be created.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the cart or item does not exist, or
    /// `StoreError::DuplicateLine` if the cart already holds the item.
    pub fn insert_line(&mut self, line: CartLine) -> Result<&CartLine, StoreError> {
        if !self.carts.contains_key(&line.cart_id) {
            return Err(StoreError::NotFound(Entity::Cart));
        }
        if !self.items.contains_key(&line.item_id) {
            return Err(StoreError::NotFound(Entity::Item));
        }

        match self.cart_lines.entry(line.key()) {
            std::collections::btree_map::Entry::Occupied(_) => Err(StoreError::DuplicateLine {
                cart_id: line.cart_id,
                item_id: line.item_id,
            }),
            std::collections::btree_map::Entry::Vacant(slot) => Ok(slot.insert(line)),
        }
    }

    #[must_use]
    pub fn line(&self, key: CartLineKey) -> Option<&CartLine> {
        self.cart_lines.get(&key)
    }

    /// Remove one cart line.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the line does not exist.
    pub fn remove_line(&mut self, key: CartLineKey) -> Result<CartLine, StoreError> {
        self.cart_lines
            .remove(&key)
            .ok_or(StoreError::NotFound(Entity::CartLine))
    }

    /// Lines of one cart, ordered by item ID.
    pub fn lines_for_cart(&self, cart_id: CartId) -> impl Iterator<Item = &CartLine> {
        self.cart_lines
            .range(CartLineKey::first_of(cart_id)..=CartLineKey::last_of(cart_id))
            .map(|(_, line)| line)
    }

    #[must_use]
    pub fn line_count(&self, cart_id: CartId) -> usize {
        self.lines_for_cart(cart_id).count()
    }

    /// Remove every line of a cart, returning how many were removed.
    pub fn clear_lines(&mut self, cart_id: CartId) -> usize {
        let keys: Vec<CartLineKey> = self
            .lines_for_cart(cart_id)
            .map(CartLine::key)
            .collect();
        for key in &keys {
            self.cart_lines.remove(key);
        }
        keys.len()
    }

    /// Remove every line referencing an item, across all carts.
    pub fn remove_lines_for_item(&mut self, item_id: ItemId) -> usize {
        let before = self.cart_lines.len();
        self.cart_lines.retain(|key, _| key.item_id != item_id);
        before - self.cart_lines.len()
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Insert an order.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the user or source cart does not
    /// exist, or `StoreError::AlreadyExists` if the ID is taken.
    pub fn insert_order(&mut self, order: Order) -> Result<(), StoreError> {
        self.check_order_insert(&order)?;
        self.orders.insert(order.id, order);
        Ok(())
    }

    /// Check that [`Self::insert_order`] would accept `order`, without writing.
    ///
    /// # Errors
    ///
    /// Same as [`Self::insert_order`].
    pub fn check_order_insert(&self, order: &Order) -> Result<(), StoreError> {
        if !self.users.contains_key(&order.user_id) {
            return Err(StoreError::NotFound(Entity::User));
        }
        if !self.carts.contains_key(&order.cart_id) {
            return Err(StoreError::NotFound(Entity::Cart));
        }
        if self.orders.contains_key(&order.id) {
            return Err(StoreError::AlreadyExists(format!("order {}", order.id)));
        }
        Ok(())
    }

    #[must_use]
    pub fn order(&self, id: OrderId) -> Option<&Order> {
        self.orders.get(&id)
    }

    /// All orders in ID order.
    pub fn orders(&self) -> impl Iterator<Item = &Order> {
        self.orders.values()
    }

    #[must_use]
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use shopfront_core::{CartStatus, HashedPassword, ItemStatus, UserRole};

    use super::*;

    fn tables_with_user() -> (Tables, UserId, CartId) {
        let mut tables = Tables::default();
        let user_id = UserId::new(tables.next_id());
        let cart_id = CartId::new(tables.next_id());
        tables
            .insert_user(User {
                id: user_id,
                username: Username::parse("alice").unwrap(),
                password_hash: HashedPassword::new("hash".to_string()),
                role: UserRole::Customer,
                cart_id,
                created_at: Utc::now(),
            })
            .unwrap();
        tables
            .insert_cart(Cart {
                id: cart_id,
                user_id,
                name: "Default Cart".to_string(),
                status: CartStatus::Active,
                created_at: Utc::now(),
            })
            .unwrap();
        (tables, user_id, cart_id)
    }

    fn add_item(tables: &mut Tables, name: &str) -> ItemId {
        let id = ItemId::new(tables.next_id());
        tables.insert_item(Item {
            id,
            name: name.to_string(),
            status: ItemStatus::Active,
            image: None,
            created_at: Utc::now(),
        });
        id
    }

    fn line(cart_id: CartId, item_id: ItemId) -> CartLine {
        CartLine {
            cart_id,
            item_id,
            added_at: Utc::now(),
        }
    }

    #[test]
    fn test_duplicate_username_rejected() {
        let (mut tables, _, cart_id) = tables_with_user();
        let id = UserId::new(tables.next_id());
        let err = tables
            .insert_user(User {
                id,
                username: Username::parse("ALICE").unwrap(),
                password_hash: HashedPassword::new("hash".to_string()),
                role: UserRole::Customer,
                cart_id,
                created_at: Utc::now(),
            })
            .unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists(_)));
        assert_eq!(tables.user_count(), 1);
    }

    #[test]
    fn test_cart_requires_existing_user() {
        let mut tables = Tables::default();
        let err = tables
            .insert_cart(Cart {
                id: CartId::new(1),
                user_id: UserId::new(99),
                name: "Orphan".to_string(),
                status: CartStatus::Active,
                created_at: Utc::now(),
            })
            .unwrap_err();
        assert_eq!(err, StoreError::NotFound(Entity::User));
    }

    #[test]
    fn test_insert_line_checks_references_and_duplicates() {
        let (mut tables, _, cart_id) = tables_with_user();
        let item_id = add_item(&mut tables, "Laptop");

        assert_eq!(
            tables.insert_line(line(CartId::new(999), item_id)).unwrap_err(),
            StoreError::NotFound(Entity::Cart)
        );
        assert_eq!(
            tables.insert_line(line(cart_id, ItemId::new(999))).unwrap_err(),
            StoreError::NotFound(Entity::Item)
        );

        tables.insert_line(line(cart_id, item_id)).unwrap();
        assert_eq!(
            tables.insert_line(line(cart_id, item_id)).unwrap_err(),
            StoreError::DuplicateLine { cart_id, item_id }
        );
        assert_eq!(tables.line_count(cart_id), 1);
    }

    #[test]
    fn test_lines_for_cart_only_returns_that_cart() {
        let (mut tables, user_id, cart_id) = tables_with_user();
        let other_cart = CartId::new(tables.next_id());
        tables
            .insert_cart(Cart {
                id: other_cart,
                user_id,
                name: "Other".to_string(),
                status: CartStatus::Ordered,
                created_at: Utc::now(),
            })
            .unwrap();
        let a = add_item(&mut tables, "Laptop");
        let b = add_item(&mut tables, "Mouse");

        tables.insert_line(line(cart_id, a)).unwrap();
        tables.insert_line(line(cart_id, b)).unwrap();
        tables.insert_line(line(other_cart, a)).unwrap();

        let items: Vec<ItemId> = tables.lines_for_cart(cart_id).map(|l| l.item_id).collect();
        assert_eq!(items, vec![a, b]);
        assert_eq!(tables.line_count(other_cart), 1);

        assert_eq!(tables.clear_lines(cart_id), 2);
        assert_eq!(tables.clear_lines(cart_id), 0);
        assert_eq!(tables.line_count(other_cart), 1);
    }

    #[test]
    fn test_remove_item_cascades_to_lines() {
        let (mut tables, _, cart_id) = tables_with_user();
        let a = add_item(&mut tables, "Laptop");
        let b = add_item(&mut tables, "Mouse");
        tables.insert_line(line(cart_id, a)).unwrap();
        tables.insert_line(line(cart_id, b)).unwrap();

        let (removed, lines) = tables.remove_item(a).unwrap();
        assert_eq!(removed.name, "Laptop");
        assert_eq!(lines, 1);
        assert!(tables.line(CartLineKey::new(cart_id, a)).is_none());
        assert!(tables.line(CartLineKey::new(cart_id, b)).is_some());

        assert_eq!(
            tables.remove_item(a).unwrap_err(),
            StoreError::NotFound(Entity::Item)
        );
    }

    #[test]
    fn test_remove_missing_line() {
        let (mut tables, _, cart_id) = tables_with_user();
        assert_eq!(
            tables
                .remove_line(CartLineKey::new(cart_id, ItemId::new(42)))
                .unwrap_err(),
            StoreError::NotFound(Entity::CartLine)
        );
    }

    #[test]
    fn test_active_cart_ignores_ordered_cart() {
        let (mut tables, user_id, cart_id) = tables_with_user();
        assert_eq!(tables.active_cart(user_id).map(|c| c.id), Some(cart_id));

        tables.cart_mut(cart_id).unwrap().status = CartStatus::Ordered;
        assert!(tables.active_cart(user_id).is_none());
        assert!(tables.active_cart(UserId::new(999)).is_none());
    }
}
