//! Error types and the centralised error responders.
//!
//! Every failure a handler can hit ends up in one of three responders:
//!
//! - [`server_error`] - logs the error with a backtrace, answers 500
//! - [`client_error`] - answers with the reason phrase of a 4xx status
//! - [`not_found`] - shorthand for `client_error(404)`
//!
//! Internal error text never reaches the response body.

use std::backtrace::Backtrace;
use std::fmt::Display;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::domain::error::ModelError;
use crate::infrastructure::session::SessionError;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Bad input from the client.
    #[error("client error: {0}")]
    Client(StatusCode),

    #[error("resource not found")]
    NotFound,

    /// Unexpected runtime failure (database, template, session store).
    #[error("internal error: {0}")]
    Internal(#[source] BoxError),

    /// A programming mistake such as an undecodable form target or a missing
    /// middleware. Never caused by user input.
    #[error("programmer error: {0}")]
    Defect(String),
}

impl AppError {
    pub fn internal(err: impl Into<BoxError>) -> Self {
        Self::Internal(err.into())
    }

    pub fn defect(message: impl Into<String>) -> Self {
        Self::Defect(message.into())
    }
}

impl From<ModelError> for AppError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::NoRecord => AppError::NotFound,
            other => AppError::internal(other),
        }
    }
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        AppError::internal(err)
    }
}

impl From<askama::Error> for AppError {
    fn from(err: askama::Error) -> Self {
        AppError::internal(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Client(status) => client_error(status),
            AppError::NotFound => not_found(),
            AppError::Internal(err) => server_error(&err),
            AppError::Defect(message) => {
                let trace = Backtrace::force_capture();
                tracing::error!(
                    error = %message,
                    trace = %trace,
                    "programmer error while handling request"
                );
                internal_server_error()
            }
        }
    }
}

/// Logs `err` at error level with a backtrace and answers 500.
pub fn server_error(err: &dyn Display) -> Response {
    let trace = Backtrace::force_capture();
    tracing::error!(error = %err, trace = %trace, "internal server error");

    internal_server_error()
}

/// Answers `status` with its canonical reason phrase as the body.
pub fn client_error(status: StatusCode) -> Response {
    let reason = status.canonical_reason().unwrap_or("Unknown Status");
    (status, format!("{reason}\n")).into_response()
}

pub fn not_found() -> Response {
    client_error(StatusCode::NOT_FOUND)
}

pub(crate) fn internal_server_error() -> Response {
    client_error(StatusCode::INTERNAL_SERVER_ERROR)
}
