//! Liveness probe.

/// Answers `OK` without touching the database or the session.
///
/// # Endpoint
///
/// `GET /ping`
pub async fn ping() -> &'static str {
    "OK"
}
