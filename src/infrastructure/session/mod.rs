//! Server-side session storage.
//!
//! Provides a [`SessionStore`] trait with two implementations:
//! - [`PgSessionStore`] - Production PostgreSQL-backed store
//! - [`MemorySessionStore`] - In-process store for tests and local runs
//!
//! The web layer's session middleware (`crate::web::session`) is the only
//! consumer; handlers work with the session handle, never the store.

mod memory_store;
mod pg_store;
mod store;

pub use memory_store::MemorySessionStore;
pub use pg_store::PgSessionStore;
pub use store::{SessionError, SessionStore, SessionValues, spawn_cleanup_task};
