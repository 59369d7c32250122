//! Route guard for pages that need a logged-in user.

use axum::extract::Request;
use axum::http::header::CACHE_CONTROL;
use axum::http::{HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::Response;

use crate::error::client_error;
use crate::pipeline::context::is_authenticated;

/// Lets the request through only if an earlier stage marked it authenticated.
///
/// # Flow
///
/// 1. Read the [`crate::pipeline::Authenticated`] flag from the request
/// 2. Absent or false: answer `401 Unauthorized`, the next stage never runs
/// 3. True: delegate
///
/// Either way the response carries `Cache-Control: no-store`, so neither a
/// protected page nor its refusal is kept by a shared cache.
///
/// Applied per route, after [`super::authenticate::authenticate`].
pub async fn require_authentication(req: Request, next: Next) -> Response {
    let mut response = if is_authenticated(&req) {
        next.run(req).await
    } else {
        client_error(StatusCode::UNAUTHORIZED)
    };

    response
        .headers_mut()
        .insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}
