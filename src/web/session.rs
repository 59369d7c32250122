//! Cookie-keyed sessions for the web layer.
//!
//! [`load_and_save`] runs in the dynamic chain. It loads the record named by
//! the `session` cookie, hands the handler a [`Session`] through the request
//! extensions, and persists the record after the handler returns if anything
//! changed.

use std::sync::Arc;

use axum::extract::{FromRequestParts, Request, State};
use axum::http::header::SET_COOKIE;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;
use chrono::{Duration, Utc};
use parking_lot::Mutex;

use crate::error::{AppError, server_error};
use crate::infrastructure::session::{SessionError, SessionStore, SessionValues};
use crate::utils::cookie::{self, SetCookie};
use crate::utils::token::{generate_token, is_well_formed};

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "session";

/// Session key holding the logged-in user's id.
pub const AUTH_USER_KEY: &str = "authenticatedUserID";

/// Session key holding a one-shot message for the next rendered page.
pub const FLASH_KEY: &str = "flash";

/// Default session lifetime in seconds (12 hours).
pub const DEFAULT_LIFETIME_SECS: i64 = 12 * 60 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Unmodified,
    Modified,
    Destroyed,
}

#[derive(Debug)]
struct Inner {
    values: SessionValues,
    status: Status,
    renew: bool,
}

/// Handle to the current request's session.
///
/// Cloning the handle shares the same underlying state. The lock is never
/// held across an `.await`.
#[derive(Debug, Clone)]
pub struct Session {
    inner: Arc<Mutex<Inner>>,
}

impl Session {
    fn new(values: SessionValues) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                values,
                status: Status::Unmodified,
                renew: false,
            })),
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.inner.lock().values.get(key).cloned()
    }

    /// Reads an integer value; unparsable values read as absent.
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(|v| v.parse().ok())
    }

    pub fn put(&self, key: impl Into<String>, value: impl Into<String>) {
        let mut inner = self.inner.lock();
        inner.values.insert(key.into(), value.into());
        inner.status = Status::Modified;
    }

    /// Removes and returns a value.
    pub fn pop(&self, key: &str) -> Option<String> {
        let mut inner = self.inner.lock();
        let value = inner.values.remove(key);
        if value.is_some() {
            inner.status = Status::Modified;
        }
        value
    }

    pub fn remove(&self, key: &str) {
        self.pop(key);
    }

    /// Issues a new token for this session at commit time and deletes the old
    /// record. Call on every privilege change (login, logout).
    pub fn renew(&self) {
        let mut inner = self.inner.lock();
        inner.renew = true;
        inner.status = Status::Modified;
    }

    /// Drops all values and deletes the record.
    pub fn destroy(&self) {
        let mut inner = self.inner.lock();
        inner.values.clear();
        inner.status = Status::Destroyed;
    }

    fn snapshot(&self) -> (Status, bool, SessionValues) {
        let inner = self.inner.lock();
        (inner.status, inner.renew, inner.values.clone())
    }
}

impl<S: Send + Sync> FromRequestParts<S> for Session {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::defect("session middleware is not installed on this route"))
    }
}

/// Store plus cookie settings, shared by every request.
#[derive(Clone)]
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    lifetime: Duration,
    secure: bool,
}

impl SessionManager {
    pub fn new(store: Arc<dyn SessionStore>, secure: bool) -> Self {
        Self {
            store,
            lifetime: Duration::seconds(DEFAULT_LIFETIME_SECS),
            secure,
        }
    }

    /// Loads the session named by `token`; unknown or expired tokens start an
    /// empty session and are forgotten so a fresh token gets issued.
    async fn load(&self, token: Option<String>) -> Result<(Option<String>, Session), SessionError> {
        let Some(token) = token.filter(|t| is_well_formed(t)) else {
            return Ok((None, Session::new(SessionValues::new())));
        };

        match self.store.load(&token).await? {
            Some(values) => Ok((Some(token), Session::new(values))),
            None => Ok((None, Session::new(SessionValues::new()))),
        }
    }

    /// Persists `session` and returns the cookie to send, if any.
    async fn commit(
        &self,
        token: Option<String>,
        session: &Session,
    ) -> Result<Option<String>, SessionError> {
        let (status, renew, values) = session.snapshot();

        match status {
            Status::Unmodified => Ok(None),
            Status::Destroyed => {
                if let Some(token) = token {
                    self.store.delete(&token).await?;
                }
                Ok(Some(String::new()))
            }
            Status::Modified => {
                let token = match token {
                    Some(old) if renew => {
                        self.store.delete(&old).await?;
                        generate_token()
                    }
                    Some(existing) => existing,
                    None => generate_token(),
                };

                self.store
                    .save(&token, &values, Utc::now() + self.lifetime)
                    .await?;
                Ok(Some(token))
            }
        }
    }
}

/// Loads the session before the next stage and saves it afterwards.
///
/// A store failure on either side is answered with a 500 in place of the
/// handler's response.
pub async fn load_and_save(
    State(manager): State<SessionManager>,
    mut req: Request,
    next: Next,
) -> Response {
    let cookie_token = cookie::get(req.headers(), SESSION_COOKIE);

    let (token, session) = match manager.load(cookie_token).await {
        Ok(loaded) => loaded,
        Err(e) => return server_error(&e),
    };

    req.extensions_mut().insert(session.clone());
    let mut response = next.run(req).await;

    let cookie_value = match manager.commit(token, &session).await {
        Ok(Some(value)) => value,
        Ok(None) => return response,
        Err(e) => return server_error(&e),
    };

    let max_age = if cookie_value.is_empty() {
        0
    } else {
        manager.lifetime.num_seconds()
    };

    let set_cookie = SetCookie {
        name: SESSION_COOKIE,
        value: &cookie_value,
        max_age,
        secure: manager.secure,
    };

    match set_cookie.to_header_value() {
        Ok(value) => {
            response.headers_mut().append(SET_COOKIE, value);
            response
        }
        Err(e) => server_error(&e),
    }
}
