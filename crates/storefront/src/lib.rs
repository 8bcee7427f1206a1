//! Shopfront storefront library.
//!
//! An in-memory storefront backend: users, a catalog, one active cart per
//! user, and atomic cart-to-order conversion, served as a JSON API. The
//! binary in `main.rs` wires configuration, tracing and Sentry around
//! [`routes::rate_limited_app`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
