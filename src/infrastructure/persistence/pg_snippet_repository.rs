//! PostgreSQL implementation of snippet repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewSnippet, Snippet};
use crate::domain::error::ModelError;
use crate::domain::repositories::SnippetRepository;
use crate::domain::repositories::snippet_repository::LATEST_LIMIT;

/// PostgreSQL repository for snippets.
pub struct PgSnippetRepository {
    pool: Arc<PgPool>,
}

impl PgSnippetRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SnippetRepository for PgSnippetRepository {
    async fn insert(&self, snippet: NewSnippet) -> Result<i64, ModelError> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO snippets (title, content, created, expires)
            VALUES ($1, $2, NOW(), NOW() + make_interval(days => $3))
            RETURNING id
            "#,
        )
        .bind(&snippet.title)
        .bind(&snippet.content)
        .bind(snippet.expires_days)
        .fetch_one(self.pool.as_ref())
        .await?;

        tracing::debug!(snippet_id = id, "snippet inserted");

        Ok(id)
    }

    async fn get(&self, id: i64) -> Result<Snippet, ModelError> {
        sqlx::query_as::<_, Snippet>(
            r#"
            SELECT id, title, content, created, expires
            FROM snippets
            WHERE expires > NOW() AND id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?
        .ok_or(ModelError::NoRecord)
    }

    async fn latest(&self) -> Result<Vec<Snippet>, ModelError> {
        let snippets = sqlx::query_as::<_, Snippet>(
            r#"
            SELECT id, title, content, created, expires
            FROM snippets
            WHERE expires > NOW()
            ORDER BY id DESC
            LIMIT $1
            "#,
        )
        .bind(LATEST_LIMIT)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(snippets)
    }
}
