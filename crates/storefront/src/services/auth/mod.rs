//! Authentication service.
//!
//! Username and password authentication backed by Argon2id hashes.

mod error;

pub use error::AuthError;

use std::sync::LazyLock;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use shopfront_core::{HashedPassword, UserRole, Username};

use crate::db::{Store, StoreError, UserRepository};
use crate::models::User;

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Verified against when the username is unknown, so a miss costs the same
/// Argon2 work as a wrong password.
static DUMMY_HASH: LazyLock<Option<HashedPassword>> =
    LazyLock::new(|| hash_password("shopfront-unknown-user").ok());

/// Authentication service.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(store: &'a Store) -> Self {
        Self {
            users: UserRepository::new(store),
        }
    }

    /// Register a new customer with username and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidUsername` if the username fails the policy.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::UserAlreadyExists` if the username is already registered.
    pub fn register_with_password(
        &self,
        username: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        let username = Username::parse(username)?;
        validate_password(password)?;
        let password_hash = hash_password(password)?;

        self.users
            .register(username, password_hash, UserRole::Customer)
            .map_err(|e| match e {
                StoreError::AlreadyExists(_) => AuthError::UserAlreadyExists,
                other => AuthError::Store(other),
            })
    }

    /// Login with username and password.
    ///
    /// The username is canonicalised first, so `ALICE` logs in as `alice`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the username/password is wrong.
    pub fn login_with_password(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let user = Username::parse(username)
            .ok()
            .and_then(|username| self.users.find_by_username(&username));

        let Some(user) = user else {
            reject_unknown_user(password);
            return Err(AuthError::InvalidCredentials);
        };

        verify_password(password, &user.password_hash)?;

        Ok(user)
    }
}

/// Burn one verification for a login whose username has no account.
fn reject_unknown_user(password: &str) {
    if let Some(hash) = DUMMY_HASH.as_ref() {
        let _ = verify_password(password, hash);
    }
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<HashedPassword, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| HashedPassword::new(hash.to_string()))
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
///
/// # Errors
///
/// Returns `AuthError::InvalidCredentials` if the password doesn't match.
pub fn verify_password(password: &str, hash: &HashedPassword) -> Result<(), AuthError> {
    let parsed_hash =
        PasswordHash::new(hash.as_str()).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
