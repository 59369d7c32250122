//! Top-level router.
//!
//! # Route Structure
//!
//! - `GET /ping`   - liveness probe (standard chain only)
//! - `/static/*`   - static assets (standard chain only)
//! - page routes   - see [`crate::web::routes::page_routes`]
//! - anything else - `404 Not Found`
//!
//! # Middleware
//!
//! Every request passes the standard chain first:
//!
//! - **Recover panic** - a panicking handler becomes a 500
//! - **Log request** - one line per request
//! - **Secure headers** - CSP, frame and referrer policy
//!
//! Page routes then run their own dynamic or protected chain.

use std::path::Path;

use axum::middleware::from_fn;
use axum::routing::get;
use tower_http::services::ServeDir;

use crate::error::not_found;
use crate::pipeline::{BoxHandler, Chain, Middleware};
use crate::state::AppState;
use crate::web::handlers::ping;
use crate::web::middleware::log_request::log_request;
use crate::web::middleware::recover::recover_panic;
use crate::web::middleware::secure_headers::secure_headers;
use crate::web::routes::page_routes;

/// Recover panic, log request, secure headers.
pub fn standard() -> Chain {
    Chain::new([
        Middleware::from_layer(from_fn(recover_panic)),
        Middleware::from_layer(from_fn(log_request)),
        Middleware::from_layer(from_fn(secure_headers)),
    ])
}

/// Builds the whole application as one handler.
///
/// # Arguments
///
/// - `state` - dependencies shared by every handler
/// - `static_dir` - directory served under `/static`
pub fn app_router(state: AppState, static_dir: impl AsRef<Path>) -> BoxHandler {
    let router = page_routes(&state)
        .route("/ping", get(ping))
        .nest_service("/static", ServeDir::new(static_dir))
        .fallback(|| async { not_found() });

    standard().then(router)
}
