//! Core domain entities.
//!
//! - [`Snippet`] - A titled piece of text with an expiry time
//! - [`User`] - A registered account
//!
//! Entities are plain data structures; creation input travels as
//! [`NewSnippet`] / [`NewUser`].

pub mod snippet;
pub mod user;

pub use snippet::{NewSnippet, Snippet};
pub use user::{NewUser, User};
