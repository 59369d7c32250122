//! PostgreSQL repository implementations.
//!
//! Concrete implementations of the domain repository traits using SQLx with
//! bound parameters for every value.
//!
//! # Repositories
//!
//! - [`PgSnippetRepository`] - Snippet storage and retrieval
//! - [`PgUserRepository`] - User registration and password checks

pub mod password;
pub mod pg_snippet_repository;
pub mod pg_user_repository;

mod db_error;

pub use pg_snippet_repository::PgSnippetRepository;
pub use pg_user_repository::PgUserRepository;
