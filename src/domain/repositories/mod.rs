//! Repository trait definitions for the domain layer.
//!
//! These traits are the persistence contract the web layer consumes.
//! Implementations live in `crate::infrastructure::persistence`; mocks are
//! generated with `mockall` for unit tests.
//!
//! # Available Repositories
//!
//! - [`SnippetRepository`] - Snippet insert and lookups
//! - [`UserRepository`] - Registration and credential checks

pub mod snippet_repository;
pub mod user_repository;

pub use snippet_repository::SnippetRepository;
pub use user_repository::UserRepository;

#[cfg(test)]
pub use snippet_repository::MockSnippetRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
