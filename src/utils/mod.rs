//! Utility functions shared by the web middleware.
//!
//! - [`cookie`] - Cookie header parsing and `Set-Cookie` rendering
//! - [`token`] - Random token generation and comparison

pub mod cookie;
pub mod token;
