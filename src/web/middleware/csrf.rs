//! Double-submit cookie CSRF protection.
//!
//! The secret lives in the `csrf_token` cookie. Every rendered form embeds the
//! same value in a hidden `csrf_token` field, and every state-changing request
//! must send both. A cross-site page can make the browser send the cookie but
//! cannot read it to fill in the field.

use axum::body::{Body, to_bytes};
use axum::extract::{Request, State};
use axum::http::header::SET_COOKIE;
use axum::http::{Method, StatusCode};
use axum::middleware::Next;
use axum::response::Response;

use crate::error::{client_error, server_error};
use crate::pipeline::CsrfToken;
use crate::utils::cookie::{self, SetCookie};
use crate::utils::token::{generate_token, is_well_formed, tokens_match};
use crate::web::forms::MAX_FORM_BYTES;

/// Name of both the cookie and the form field.
pub const CSRF_FIELD: &str = "csrf_token";

/// Lifetime of the CSRF cookie in seconds (one year).
pub const CSRF_COOKIE_MAX_AGE: i64 = 365 * 24 * 60 * 60;

#[derive(Debug, Clone, Copy)]
pub struct CsrfConfig {
    /// Adds `Secure` to the cookie.
    pub secure: bool,
}

fn is_unsafe(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}

/// Checks the token on state-changing requests and exposes it to templates.
///
/// # Flow
///
/// 1. Read the secret from the `csrf_token` cookie, or generate one
/// 2. For POST, PUT, PATCH and DELETE, buffer the body and compare its
///    `csrf_token` field against the cookie; a missing or different value
///    is answered with `400 Bad Request`, a body over [`MAX_FORM_BYTES`]
///    with `413 Payload Too Large`
/// 3. Store a [`CsrfToken`] in the request and hand the request on with the
///    body unchanged
/// 4. Send the cookie if it was newly generated
pub async fn protect(State(config): State<CsrfConfig>, req: Request, next: Next) -> Response {
    let existing = cookie::get(req.headers(), CSRF_FIELD).filter(|t| is_well_formed(t));
    let issued = existing.is_none();
    let secret = existing.unwrap_or_else(generate_token);

    let mut req = if is_unsafe(req.method()) {
        let (parts, body) = req.into_parts();
        let bytes = match to_bytes(body, MAX_FORM_BYTES).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::debug!(error = %e, "failed to buffer request body");
                return client_error(StatusCode::PAYLOAD_TOO_LARGE);
            }
        };

        let submitted = url::form_urlencoded::parse(&bytes)
            .find(|(key, _)| key == CSRF_FIELD)
            .map(|(_, value)| value.into_owned());

        let valid = !issued && submitted.is_some_and(|token| tokens_match(&token, &secret));
        if !valid {
            tracing::warn!(
                method = %parts.method,
                uri = %parts.uri,
                "rejected request with missing or invalid CSRF token"
            );
            return client_error(StatusCode::BAD_REQUEST);
        }

        Request::from_parts(parts, Body::from(bytes))
    } else {
        req
    };

    req.extensions_mut().insert(CsrfToken::new(secret.clone()));
    let mut response = next.run(req).await;

    if issued {
        let set_cookie = SetCookie {
            name: CSRF_FIELD,
            value: &secret,
            max_age: CSRF_COOKIE_MAX_AGE,
            secure: config.secure,
        };
        match set_cookie.to_header_value() {
            Ok(value) => {
                response.headers_mut().append(SET_COOKIE, value);
            }
            Err(e) => return server_error(&e),
        }
    }

    response
}
