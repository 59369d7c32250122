//! Typed request-scoped values.
//!
//! Values are stored in the request's extensions by middleware and read by
//! later middleware or the handler. Reading a value that no earlier stage set
//! yields its "absent" meaning rather than an error.

use std::convert::Infallible;

use axum::extract::{FromRequestParts, Request};
use axum::http::Extensions;
use axum::http::request::Parts;

/// Whether the request belongs to a logged-in user.
///
/// Set by the authentication middleware; absent means not authenticated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Authenticated(pub bool);

impl Authenticated {
    pub fn from_extensions(extensions: &Extensions) -> Self {
        extensions.get::<Self>().copied().unwrap_or_default()
    }
}

/// Marks `req` as authenticated (or not).
pub fn set_authenticated(req: &mut Request, authenticated: bool) {
    req.extensions_mut().insert(Authenticated(authenticated));
}

/// Reads the authenticated flag from `req`.
pub fn is_authenticated(req: &Request) -> bool {
    Authenticated::from_extensions(req.extensions()).0
}

impl<S: Send + Sync> FromRequestParts<S> for Authenticated {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_extensions(&parts.extensions))
    }
}

/// The CSRF token to embed in forms rendered for this request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsrfToken(String);

impl CsrfToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Token set by the CSRF middleware, if it ran for this request.
    pub fn from_extensions(extensions: &Extensions) -> Option<Self> {
        extensions.get::<Self>().cloned()
    }
}
