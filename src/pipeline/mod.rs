//! Request-handling pipeline.
//!
//! A [`Chain`] is an ordered, immutable list of [`Middleware`]. Binding a
//! terminal handler with [`Chain::then`] produces a [`BoxHandler`], a cloneable
//! tower service that the router mounts or that wraps the router itself.
//!
//! Request-scoped values travel from middleware to handler through the
//! request's extensions; [`context`] holds the typed accessors for them.

pub mod chain;
pub mod context;

pub use chain::{BoxHandler, Chain, Middleware};
pub use context::{Authenticated, CsrfToken};
