//! Repository trait for user accounts.

use crate::domain::entities::{NewUser, User};
use crate::domain::error::ModelError;
use async_trait::async_trait;

/// Repository interface for user registration and authentication.
///
/// Passwords cross this boundary in plaintext and are hashed by the
/// implementation; hashes never leave it.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUserRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Registers a new user.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::DuplicateEmail`] if the email is already registered.
    /// Returns [`ModelError::Database`] on database errors.
    async fn insert(&self, user: NewUser) -> Result<(), ModelError>;

    /// Checks an email/password pair and returns the user id.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidCredentials`] if the email is unknown or
    /// the password does not match.
    async fn authenticate(&self, email: &str, password: &str) -> Result<i64, ModelError>;

    /// Returns whether a user with this id exists.
    async fn exists(&self, id: i64) -> Result<bool, ModelError>;

    /// Fetches a user by id.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::NoRecord`] if no user has this id.
    async fn get(&self, id: i64) -> Result<User, ModelError>;
}
