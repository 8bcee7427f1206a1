//! User repository.
//!
//! Registration provisions the user's first active cart in the same critical
//! section, so a user is never observable without one.

use chrono::Utc;

use shopfront_core::{CartId, CartStatus, HashedPassword, UserId, UserRole, Username};

use super::{Entity, Store, StoreError, Tables};
use crate::models::{Cart, User};

/// Display name given to carts created at registration and after checkout.
pub const DEFAULT_CART_NAME: &str = "Default Cart";

/// Repository for user operations.
pub struct UserRepository<'a> {
    store: &'a Store,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Register a user together with an empty active cart.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::AlreadyExists` if the username is taken.
    pub fn register(
        &self,
        username: Username,
        password_hash: HashedPassword,
        role: UserRole,
    ) -> Result<User, StoreError> {
        self.store.write(|tables| {
            register_in(tables, username, password_hash, role, DEFAULT_CART_NAME)
        })
    }

    /// Look up a user by canonical username.
    #[must_use]
    pub fn find_by_username(&self, username: &Username) -> Option<User> {
        self.store
            .read(|tables| tables.user_by_username(username).cloned())
    }

    /// Get a user by ID.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the user doesn't exist.
    pub fn get(&self, id: UserId) -> Result<User, StoreError> {
        self.store.read(|tables| {
            tables
                .user(id)
                .cloned()
                .ok_or(StoreError::NotFound(Entity::User))
        })
    }

    /// All users in ID order.
    #[must_use]
    pub fn list(&self) -> Vec<User> {
        self.store.read(|tables| tables.users().cloned().collect())
    }
}

/// Register a user on already-locked tables.
///
/// Nothing is written (and no ID is issued) when the username is taken.
pub(crate) fn register_in(
    tables: &mut Tables,
    username: Username,
    password_hash: HashedPassword,
    role: UserRole,
    cart_name: &str,
) -> Result<User, StoreError> {
    if tables.user_by_username(&username).is_some() {
        return Err(StoreError::AlreadyExists(format!("username '{username}'")));
    }

    let now = Utc::now();
    let user_id = UserId::new(tables.next_id());
    let cart_id = CartId::new(tables.next_id());

    let user = User {
        id: user_id,
        username,
        password_hash,
        role,
        cart_id,
        created_at: now,
    };
    tables.insert_user(user.clone())?;
    tables.insert_cart(Cart {
        id: cart_id,
        user_id,
        name: cart_name.to_owned(),
        status: CartStatus::Active,
        created_at: now,
    })?;

    tracing::info!(user_id = %user_id, username = %user.username, role = %role, "user registered");
    Ok(user)
}
