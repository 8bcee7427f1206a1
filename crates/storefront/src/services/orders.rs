//! Order service.
//!
//! Converting a cart into an order is one indivisible step: the active cart is
//! frozen, its lines are snapshotted, and a fresh active cart is provisioned,
//! all under a single write lock. Either every effect is visible or none is.

use chrono::Utc;

use shopfront_core::{CartId, CartStatus, OrderId, UserId};

use crate::db::{Entity, Store, StoreError, Tables, projections};
use crate::models::{Cart, Order, OrderLine, OrderView};

/// Order service.
pub struct OrderService<'a> {
    store: &'a Store,
}

impl<'a> OrderService<'a> {
    /// Create a new order service.
    #[must_use]
    pub const fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Convert the user's active cart into an order.
    ///
    /// On success the source cart is `ordered` and emptied, the order holds a
    /// snapshot of its items, and the user points at a new empty active cart
    /// carrying the source cart's name.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` if the user (or an item in the cart) is missing
    /// - `StoreError::NoActiveCart` if the user has no active cart
    /// - `StoreError::EmptyCart` if the active cart has no lines
    pub fn create_order(&self, user_id: UserId) -> Result<OrderView, StoreError> {
        let view = self
            .store
            .write(|tables| convert_active_cart(tables, user_id))?;

        tracing::info!(
            user_id = %user_id,
            order_id = %view.order.id,
            cart_id = %view.order.cart_id,
            lines = view.total_items,
            "order created"
        );
        Ok(view)
    }

    /// One of the user's own orders.
    ///
    /// An order belonging to someone else is reported as not found.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the order doesn't exist or isn't the user's.
    pub fn get_order(&self, user_id: UserId, order_id: OrderId) -> Result<OrderView, StoreError> {
        self.store.read(|tables| {
            tables
                .order(order_id)
                .filter(|order| order.user_id == user_id)
                .map(|order| projections::order_view(tables, order))
                .ok_or(StoreError::NotFound(Entity::Order))
        })
    }

    /// The user's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the user doesn't exist.
    pub fn orders_for_user(&self, user_id: UserId) -> Result<Vec<OrderView>, StoreError> {
        self.store.read(|tables| {
            if tables.user(user_id).is_none() {
                return Err(StoreError::NotFound(Entity::User));
            }
            Ok(projections::order_views_newest_first(tables, |order| {
                order.user_id == user_id
            }))
        })
    }

    /// Any order by ID (admin view).
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the order doesn't exist.
    pub fn order_by_id(&self, order_id: OrderId) -> Result<OrderView, StoreError> {
        self.store
            .read(|tables| projections::order_view_by_id(tables, order_id))
    }

    /// Every order, newest first (admin view).
    #[must_use]
    pub fn all_orders(&self) -> Vec<OrderView> {
        self.store
            .read(|tables| projections::order_views_newest_first(tables, |_| true))
    }
}

/// Validate, then apply every effect of a checkout.
///
/// All checks run before the first mutation, so an error leaves the tables
/// untouched.
fn convert_active_cart(tables: &mut Tables, user_id: UserId) -> Result<OrderView, StoreError> {
    if tables.user(user_id).is_none() {
        return Err(StoreError::NotFound(Entity::User));
    }
    let (source_cart_id, source_cart_name) = tables
        .active_cart(user_id)
        .map(|cart| (cart.id, cart.name.clone()))
        .ok_or(StoreError::NoActiveCart)?;

    let lines = tables
        .lines_for_cart(source_cart_id)
        .map(|line| {
            tables
                .item(line.item_id)
                .map(|item| OrderLine {
                    item: item.clone(),
                    added_at: line.added_at,
                })
                .ok_or(StoreError::NotFound(Entity::Item))
        })
        .collect::<Result<Vec<_>, StoreError>>()?;
    if lines.is_empty() {
        return Err(StoreError::EmptyCart);
    }

    let now = Utc::now();
    let order_id = OrderId::new(tables.next_id());
    let new_cart_id = CartId::new(tables.next_id());

    let new_cart = Cart {
        id: new_cart_id,
        user_id,
        name: source_cart_name,
        status: CartStatus::Active,
        created_at: now,
    };
    let order = Order {
        id: order_id,
        cart_id: source_cart_id,
        user_id,
        created_at: now,
        lines,
    };
    tables.check_cart_insert(&new_cart)?;
    tables.check_order_insert(&order)?;

    // Nothing below can fail
    if let Some(cart) = tables.cart_mut(source_cart_id) {
        cart.status = CartStatus::Ordered;
    }
    tables.insert_cart(new_cart)?;
    if let Some(user) = tables.user_mut(user_id) {
        user.cart_id = new_cart_id;
    }
    tables.insert_order(order.clone())?;
    tables.clear_lines(source_cart_id);

    Ok(projections::order_view(tables, &order))
}
