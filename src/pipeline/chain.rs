//! Ordered middleware composition.

use std::convert::Infallible;
use std::fmt;
use std::sync::Arc;

use axum::extract::Request;
use axum::response::Response;
use tower::util::BoxCloneSyncService;
use tower::{Layer, Service};

/// Type-erased handler every middleware receives and returns.
pub type BoxHandler = BoxCloneSyncService<Request, Response, Infallible>;

type Wrap = dyn Fn(BoxHandler) -> BoxHandler + Send + Sync;

/// A function from the next handler to a new handler.
///
/// Usually built from an `async fn(Request, Next) -> Response` through
/// [`axum::middleware::from_fn`], or from any other tower [`Layer`].
#[derive(Clone)]
pub struct Middleware {
    wrap: Arc<Wrap>,
}

impl Middleware {
    /// Creates a middleware from a wrapping function.
    pub fn new<F>(wrap: F) -> Self
    where
        F: Fn(BoxHandler) -> BoxHandler + Send + Sync + 'static,
    {
        Self {
            wrap: Arc::new(wrap),
        }
    }

    /// Adapts a tower layer.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use axum::middleware::from_fn;
    ///
    /// let logging = Middleware::from_layer(from_fn(log_request));
    /// ```
    pub fn from_layer<L>(layer: L) -> Self
    where
        L: Layer<BoxHandler> + Send + Sync + 'static,
        L::Service: Service<Request, Response = Response, Error = Infallible>
            + Clone
            + Send
            + Sync
            + 'static,
        <L::Service as Service<Request>>::Future: Send + 'static,
    {
        Self::new(move |next| BoxCloneSyncService::new(layer.layer(next)))
    }

    fn wrap(&self, next: BoxHandler) -> BoxHandler {
        (self.wrap)(next)
    }
}

impl fmt::Debug for Middleware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Middleware").finish_non_exhaustive()
    }
}

/// Ordered sequence of middleware.
///
/// For middleware `[m1, m2, m3]` and handler `h`, [`Chain::then`] builds
/// `m1(m2(m3(h)))`: `m1` sees the request first and the response last.
///
/// A chain is never mutated after construction. [`Chain::append`] returns a
/// new chain and leaves the receiver as it was.
///
/// # Example
///
/// ```rust,ignore
/// let dynamic = Chain::new([session, csrf, authenticate]);
/// let protected = dynamic.append([require_authentication]);
///
/// let view = dynamic.then(get(snippet_view).with_state::<()>(state.clone()));
/// let create = protected.then(get(snippet_create).with_state::<()>(state));
/// ```
#[derive(Clone, Debug, Default)]
pub struct Chain {
    middleware: Arc<[Middleware]>,
}

impl Chain {
    /// Creates a chain, preserving the given order.
    pub fn new(middleware: impl IntoIterator<Item = Middleware>) -> Self {
        Self {
            middleware: middleware.into_iter().collect(),
        }
    }

    /// Returns a new chain with `middleware` placed after the existing entries.
    pub fn append(&self, middleware: impl IntoIterator<Item = Middleware>) -> Self {
        Self {
            middleware: self
                .middleware
                .iter()
                .cloned()
                .chain(middleware)
                .collect(),
        }
    }

    /// Binds the terminal handler and returns the composed handler.
    ///
    /// With no middleware the result is the handler itself, only boxed.
    pub fn then<S>(&self, handler: S) -> BoxHandler
    where
        S: Service<Request, Response = Response, Error = Infallible> + Clone + Send + Sync + 'static,
        S::Future: Send + 'static,
    {
        self.middleware
            .iter()
            .rev()
            .fold(BoxCloneSyncService::new(handler), |next, m| m.wrap(next))
    }

    /// Number of middleware in the chain.
    pub fn len(&self) -> usize {
        self.middleware.len()
    }

    pub fn is_empty(&self) -> bool {
        self.middleware.is_empty()
    }
}
