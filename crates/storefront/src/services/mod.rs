//! Business logic services for storefront.
//!
//! # Services
//!
//! - `auth` - Password registration and login
//! - `cart` - Cart lifecycle: one active cart per user, add/remove/clear
//! - `orders` - Atomic cart-to-order conversion and order history
//!
//! Services borrow the [`crate::db::Store`] and take its lock exactly once
//! per public operation.

pub mod auth;
pub mod cart;
pub mod orders;

pub use auth::{AuthError, AuthService};
pub use cart::CartService;
pub use orders::OrderService;
