//! Session store trait and error types.

use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::FutureExt;
use tokio::task::JoinHandle;

/// Named string values kept for one client session.
pub type SessionValues = HashMap<String, String>;

/// Errors raised by session stores.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session store database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Persistence for session records keyed by an opaque token.
///
/// # Implementations
///
/// - [`crate::infrastructure::session::PgSessionStore`] - rows in the `sessions` table
/// - [`crate::infrastructure::session::MemorySessionStore`] - in-process map
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Loads the values for `token`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(values))` if the session exists and has not expired
    /// - `Ok(None)` otherwise
    async fn load(&self, token: &str) -> Result<Option<SessionValues>, SessionError>;

    /// Inserts or replaces the record for `token`.
    async fn save(
        &self,
        token: &str,
        values: &SessionValues,
        expires_at: DateTime<Utc>,
    ) -> Result<(), SessionError>;

    /// Removes the record for `token`. Deleting an unknown token is not an error.
    async fn delete(&self, token: &str) -> Result<(), SessionError>;

    /// Removes every expired record and returns how many were dropped.
    async fn delete_expired(&self) -> Result<u64, SessionError>;
}

/// Spawns a background task that purges expired sessions every `period`.
///
/// The task runs outside any request, so it catches its own panics; a
/// panicking sweep is logged and the next tick runs normally.
pub fn spawn_cleanup_task(store: Arc<dyn SessionStore>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            match AssertUnwindSafe(store.delete_expired()).catch_unwind().await {
                Ok(Ok(0)) => {}
                Ok(Ok(removed)) => tracing::debug!(removed, "expired sessions removed"),
                Ok(Err(e)) => tracing::warn!(error = %e, "session cleanup failed"),
                Err(_) => tracing::error!("session cleanup panicked"),
            }
        }
    })
}
