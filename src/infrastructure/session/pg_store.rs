//! PostgreSQL implementation of session store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;
use std::sync::Arc;

use super::store::{SessionError, SessionStore, SessionValues};

/// PostgreSQL session store backed by the `sessions` table.
///
/// Values are stored as a JSONB object; expiry is checked on every load and
/// expired rows are purged by [`super::spawn_cleanup_task`].
pub struct PgSessionStore {
    pool: Arc<PgPool>,
}

impl PgSessionStore {
    /// Creates a new store with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn load(&self, token: &str) -> Result<Option<SessionValues>, SessionError> {
        let row = sqlx::query_scalar::<_, Json<SessionValues>>(
            r#"
            SELECT data
            FROM sessions
            WHERE token = $1 AND expiry > NOW()
            "#,
        )
        .bind(token)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(|Json(values)| values))
    }

    async fn save(
        &self,
        token: &str,
        values: &SessionValues,
        expires_at: DateTime<Utc>,
    ) -> Result<(), SessionError> {
        sqlx::query(
            r#"
            INSERT INTO sessions (token, data, expiry)
            VALUES ($1, $2, $3)
            ON CONFLICT (token)
            DO UPDATE SET data = EXCLUDED.data, expiry = EXCLUDED.expiry
            "#,
        )
        .bind(token)
        .bind(Json(values))
        .bind(expires_at)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn delete(&self, token: &str) -> Result<(), SessionError> {
        sqlx::query("DELETE FROM sessions WHERE token = $1")
            .bind(token)
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }

    async fn delete_expired(&self) -> Result<u64, SessionError> {
        let result = sqlx::query("DELETE FROM sessions WHERE expiry < NOW()")
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected())
    }
}
