//! Shopfront Core - Shared domain types.
//!
//! This crate provides the types shared by every Shopfront component:
//! - `storefront` - In-memory store, cart/order lifecycle and the JSON API
//! - `integration-tests` - End-to-end scenarios against the storefront library
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no locking, no HTTP. This
//! keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, usernames, credentials, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
