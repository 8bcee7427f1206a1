//! Cart and cart line types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use shopfront_core::{CartId, CartStatus, ItemId, UserId};

use super::Item;

/// A shopping cart.
///
/// Each user has exactly one `active` cart at a time; converting it into an
/// order flips it to `ordered` and provisions a new one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cart {
    pub id: CartId,
    pub user_id: UserId,
    pub name: String,
    pub status: CartStatus,
    pub created_at: DateTime<Utc>,
}

/// Composite identity of a cart line.
///
/// Ordered by cart first, so all lines of a cart form one contiguous range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CartLineKey {
    pub cart_id: CartId,
    pub item_id: ItemId,
}

impl CartLineKey {
    #[must_use]
    pub const fn new(cart_id: CartId, item_id: ItemId) -> Self {
        Self { cart_id, item_id }
    }

    /// Lowest key belonging to `cart_id`.
    #[must_use]
    pub const fn first_of(cart_id: CartId) -> Self {
        Self::new(cart_id, ItemId::MIN)
    }

    /// Highest key belonging to `cart_id`.
    #[must_use]
    pub const fn last_of(cart_id: CartId) -> Self {
        Self::new(cart_id, ItemId::MAX)
    }
}

/// An item placed in a cart. A cart holds a given item at most once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartLine {
    pub cart_id: CartId,
    pub item_id: ItemId,
    pub added_at: DateTime<Utc>,
}

impl CartLine {
    #[must_use]
    pub const fn key(&self) -> CartLineKey {
        CartLineKey::new(self.cart_id, self.item_id)
    }
}

/// A cart line with its item resolved.
#[derive(Debug, Clone, Serialize)]
pub struct CartLineView {
    pub item: Item,
    pub added_at: DateTime<Utc>,
}

/// A cart together with its resolved lines.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    #[serde(flatten)]
    pub cart: Cart,
    pub lines: Vec<CartLineView>,
    pub total_items: usize,
}
