#![allow(dead_code)]

use sqlx::PgPool;
use std::sync::Arc;
use snippetbox::infrastructure::persistence::{PgSnippetRepository, PgUserRepository};
use snippetbox::infrastructure::session::PgSessionStore;
use snippetbox::state::AppState;
use snippetbox::web::middleware::csrf::CsrfConfig;
use snippetbox::web::session::SessionManager;

/// bcrypt cost used in tests; the minimum the crate accepts.
pub const TEST_COST: u32 = 4;

pub async fn create_test_snippet(pool: &PgPool, title: &str, expires_in_days: i32) -> i64 {
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO snippets (title, content, created, expires)
         VALUES ($1, 'content', NOW(), NOW() + make_interval(days => $2))
         RETURNING id",
    )
    .bind(title)
    .bind(expires_in_days)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn create_expired_snippet(pool: &PgPool, title: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO snippets (title, content, created, expires)
         VALUES ($1, 'content', NOW() - INTERVAL '2 days', NOW() - INTERVAL '1 hour')
         RETURNING id",
    )
    .bind(title)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub fn create_test_state(pool: PgPool) -> AppState {
    let pool = Arc::new(pool);
    AppState::new(
        Arc::new(PgSnippetRepository::new(pool.clone())),
        Arc::new(PgUserRepository::with_cost(pool.clone(), TEST_COST)),
        SessionManager::new(Arc::new(PgSessionStore::new(pool)), false),
        CsrfConfig { secure: false },
    )
}
