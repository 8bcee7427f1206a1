//! Core types for Shopfront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod credential;
pub mod id;
pub mod status;
pub mod username;

pub use credential::HashedPassword;
pub use id::*;
pub use status::*;
pub use username::{Username, UsernameError};
