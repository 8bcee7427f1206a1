//! Read-side projections joining across collections.
//!
//! Every function here takes already-borrowed tables and never mutates them.
//! Callers obtain the tables through a single [`super::Store::read`] (or
//! inside a write) so the whole projection sees one consistent snapshot.

use std::cmp::Reverse;

use shopfront_core::{CartId, OrderId, UserId};

use super::{Entity, StoreError, Tables};
use crate::models::{CartLineView, CartView, Order, OrderView};

/// A cart with every line's item resolved.
///
/// # Errors
///
/// Returns `StoreError::NotFound` if the cart (or a referenced item) is missing.
pub fn cart_view(tables: &Tables, cart_id: CartId) -> Result<CartView, StoreError> {
    let cart = tables
        .cart(cart_id)
        .ok_or(StoreError::NotFound(Entity::Cart))?;

    let lines = tables
        .lines_for_cart(cart_id)
        .map(|line| {
            let item = tables
                .item(line.item_id)
                .ok_or(StoreError::NotFound(Entity::Item))?;
            Ok(CartLineView {
                item: item.clone(),
                added_at: line.added_at,
            })
        })
        .collect::<Result<Vec<_>, StoreError>>()?;

    Ok(CartView {
        cart: cart.clone(),
        total_items: lines.len(),
        lines,
    })
}

/// The user's active cart with resolved lines.
///
/// # Errors
///
/// Returns `StoreError::NotFound` if the user or their active cart is missing.
pub fn active_cart_view(tables: &Tables, user_id: UserId) -> Result<CartView, StoreError> {
    if tables.user(user_id).is_none() {
        return Err(StoreError::NotFound(Entity::User));
    }
    let cart = tables
        .active_cart(user_id)
        .ok_or(StoreError::NotFound(Entity::Cart))?;
    cart_view(tables, cart.id)
}

/// Every cart with resolved lines, in ID order.
///
/// # Errors
///
/// Returns `StoreError::NotFound` if a line references a missing item.
pub fn all_cart_views(tables: &Tables) -> Result<Vec<CartView>, StoreError> {
    tables
        .carts()
        .map(|cart| cart_view(tables, cart.id))
        .collect()
}

/// An order with its source cart resolved.
#[must_use]
pub fn order_view(tables: &Tables, order: &Order) -> OrderView {
    OrderView {
        order: order.clone(),
        cart: tables.cart(order.cart_id).cloned(),
        total_items: order.lines.len(),
    }
}

/// One order by ID.
///
/// # Errors
///
/// Returns `StoreError::NotFound` if the order doesn't exist.
pub fn order_view_by_id(tables: &Tables, order_id: OrderId) -> Result<OrderView, StoreError> {
    tables
        .order(order_id)
        .map(|order| order_view(tables, order))
        .ok_or(StoreError::NotFound(Entity::Order))
}

/// Orders matching `include`, newest first.
///
/// Orders created within the same clock tick are ordered by ID, highest first.
pub fn order_views_newest_first(
    tables: &Tables,
    include: impl Fn(&Order) -> bool,
) -> Vec<OrderView> {
    let mut orders: Vec<&Order> = tables.orders().filter(|order| include(order)).collect();
    orders.sort_by_key(|order| Reverse((order.created_at, order.id)));
    orders
        .into_iter()
        .map(|order| order_view(tables, order))
        .collect()
}
