//! Errors returned across the persistence boundary.

/// Conditions a repository can report.
///
/// The first three variants are expected outcomes that handlers branch on.
/// [`ModelError::Database`] and [`ModelError::PasswordHash`] are unexpected
/// failures and end up as a 500 response.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("no matching record found")]
    NoRecord,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("duplicate email")]
    DuplicateEmail,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("password hashing failed: {0}")]
    PasswordHash(String),
}
