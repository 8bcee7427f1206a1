//! Order types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use shopfront_core::{CartId, OrderId, UserId};

use super::{Cart, Item};

/// A frozen copy of one cart line, taken when the order was placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderLine {
    /// The item as it was at conversion time.
    pub item: Item,
    /// When the line was added to the cart.
    pub added_at: DateTime<Utc>,
}

/// A placed order. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Order {
    pub id: OrderId,
    /// The cart this order was converted from.
    pub cart_id: CartId,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub lines: Vec<OrderLine>,
}

/// An order with its source cart resolved.
#[derive(Debug, Clone, Serialize)]
pub struct OrderView {
    #[serde(flatten)]
    pub order: Order,
    /// The source cart, if it still exists.
    pub cart: Option<Cart>,
    pub total_items: usize,
}
