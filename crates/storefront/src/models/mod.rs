//! Domain models for the storefront.
//!
//! Entity types are stored in [`crate::db::Tables`]; view types are the
//! denormalized read projections returned to callers.

pub mod cart;
pub mod item;
pub mod order;
pub mod session;
pub mod user;

pub use cart::{Cart, CartLine, CartLineKey, CartLineView, CartView};
pub use item::{Item, ItemFilter, ItemPage, NewItem};
pub use order::{Order, OrderLine, OrderView};
pub use session::{CurrentUser, keys as session_keys};
pub use user::User;
