//! User domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use shopfront_core::{CartId, HashedPassword, UserId, UserRole, Username};

/// A registered user.
///
/// The password hash never leaves the process: it is skipped on
/// serialization and redacted in `Debug`.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Canonical (lowercased) username.
    pub username: Username,
    /// Argon2 password hash.
    #[serde(skip)]
    pub password_hash: HashedPassword,
    /// Account role.
    pub role: UserRole,
    /// The user's current active cart.
    pub cart_id: CartId,
    /// When the user registered.
    pub created_at: DateTime<Utc>,
}
