//! In-memory entity store.
//!
//! # Collections
//!
//! - `users` - registered accounts, indexed by canonical username
//! - `items` - the catalog
//! - `carts` - one active cart per user plus every ordered cart
//! - `cart_lines` - keyed by (cart, item)
//! - `orders` - immutable snapshots of converted carts
//!
//! All collections and the ID sequence live in one [`Tables`] value behind a
//! single reader/writer lock. The lock is taken only by [`Store::read`] and
//! [`Store::write`]; everything below them operates on already-borrowed
//! tables, so no call chain ever locks twice.
//!
//! State is process-lifetime only. See [`seed`] for the start-up catalog and
//! bootstrap account.

pub mod items;
pub mod projections;
pub mod seed;
pub mod sequence;
pub mod tables;
pub mod users;

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;

use shopfront_core::{CartId, ItemId, ItemStatus};

pub use items::ItemRepository;
pub use sequence::IdSequence;
pub use tables::Tables;
pub use users::UserRepository;

/// Entity kinds, for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    User,
    Item,
    Cart,
    CartLine,
    Order,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Item => write!(f, "item"),
            Self::Cart => write!(f, "cart"),
            Self::CartLine => write!(f, "cart line"),
            Self::Order => write!(f, "order"),
        }
    }
}

/// Errors that can occur during store operations.
///
/// A failed operation never leaves a partial write behind.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// Referenced entity does not exist.
    #[error("{0} not found")]
    NotFound(Entity),

    /// Uniqueness violation (e.g. username taken).
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// The cart already holds this item.
    #[error("item {item_id} is already in cart {cart_id}")]
    DuplicateLine { cart_id: CartId, item_id: ItemId },

    /// The item's status does not allow purchase.
    #[error("item {item_id} is not available (status: {status})")]
    ItemUnavailable { item_id: ItemId, status: ItemStatus },

    /// The user has no active cart to convert.
    #[error("no active cart")]
    NoActiveCart,

    /// The active cart has no lines.
    #[error("cart is empty")]
    EmptyCart,
}

/// Shared handle to the in-memory tables.
///
/// Cheap to clone; every clone refers to the same tables. Construct one per
/// process (or per test) and pass it to the repositories and services that
/// need it.
#[derive(Clone, Default)]
pub struct Store {
    tables: Arc<RwLock<Tables>>,
}

impl Store {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` under the shared lock.
    ///
    /// Concurrent readers proceed in parallel; writers wait. Use one call per
    /// projection so the result reflects a single consistent snapshot.
    pub fn read<R>(&self, f: impl FnOnce(&Tables) -> R) -> R {
        let tables = self.tables.read();
        f(&tables)
    }

    /// Run `f` under the exclusive lock.
    ///
    /// The whole closure is one indivisible unit: no reader or writer can
    /// observe an intermediate state. `f` must validate before it mutates.
    pub fn write<R>(&self, f: impl FnOnce(&mut Tables) -> R) -> R {
        let mut tables = self.tables.write();
        f(&mut tables)
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tables = self.tables.read();
        f.debug_struct("Store")
            .field("users", &tables.user_count())
            .field("items", &tables.item_count())
            .field("carts", &tables.cart_count())
            .field("orders", &tables.order_count())
            .finish()
    }
}
