//! Domain layer containing business entities and persistence contracts.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`error`] - Sentinel conditions returned by repositories
//!
//! The web layer depends only on the traits declared here, never on the
//! concrete PostgreSQL implementations in [`crate::infrastructure`].

pub mod entities;
pub mod error;
pub mod repositories;
