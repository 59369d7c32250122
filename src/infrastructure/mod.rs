//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer and the
//! session store consumed by the web layer.
//!
//! # Modules
//!
//! - [`persistence`] - PostgreSQL repository implementations and password hashing
//! - [`session`] - Session stores (PostgreSQL and in-memory)

pub mod persistence;
pub mod session;
