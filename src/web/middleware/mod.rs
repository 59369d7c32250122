//! Web middleware.
//!
//! Standard chain, applied to every request in this order:
//!
//! - [`recover`] - turns a handler panic into a 500 and closes the connection
//! - [`log_request`] - one structured line per request
//! - [`secure_headers`] - fixed browser security headers
//!
//! Dynamic chain, applied per route:
//!
//! - [`crate::web::session::load_and_save`] - session load/save
//! - [`csrf`] - CSRF cookie and form token check
//! - [`authenticate`] - sets the authenticated flag from the session
//!
//! Protected routes add [`require_auth`] on top of the dynamic chain.

pub mod authenticate;
pub mod csrf;
pub mod log_request;
pub mod recover;
pub mod require_auth;
pub mod secure_headers;
