//! Repository trait for snippet data access.

use crate::domain::entities::{NewSnippet, Snippet};
use crate::domain::error::ModelError;
use async_trait::async_trait;

/// Number of snippets returned by [`SnippetRepository::latest`].
pub const LATEST_LIMIT: i64 = 10;

/// Repository interface for snippets.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgSnippetRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SnippetRepository: Send + Sync {
    /// Inserts a snippet and returns its id.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Database`] on database errors.
    async fn insert(&self, snippet: NewSnippet) -> Result<i64, ModelError>;

    /// Fetches an unexpired snippet by id.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::NoRecord`] if the snippet does not exist or has expired.
    /// Returns [`ModelError::Database`] on database errors.
    async fn get(&self, id: i64) -> Result<Snippet, ModelError>;

    /// Returns the [`LATEST_LIMIT`] most recently created unexpired snippets,
    /// newest first.
    async fn latest(&self) -> Result<Vec<Snippet>, ModelError>;
}
