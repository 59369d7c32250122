//! Server-rendered pages.
//!
//! # Modules
//!
//! - [`handlers`] - page handlers
//! - [`middleware`] - standard and per-route middleware
//! - [`session`] - cookie-keyed sessions
//! - [`forms`] - form decoding and validation
//! - [`templates`] - page types and rendering
//! - [`routes`] - page routes and their chains

pub mod forms;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod session;
pub mod templates;
