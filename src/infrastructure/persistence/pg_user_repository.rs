//! PostgreSQL implementation of user repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use super::db_error::is_unique_violation_on;
use super::password::{DEFAULT_COST, hash_password, verify_password};
use crate::domain::entities::{NewUser, User};
use crate::domain::error::ModelError;
use crate::domain::repositories::UserRepository;

/// Unique constraint guarding `users.email`.
const EMAIL_CONSTRAINT: &str = "users_uc_email";

/// PostgreSQL repository for user accounts.
///
/// Passwords are stored as bcrypt hashes. Raw passwords are never persisted.
pub struct PgUserRepository {
    pool: Arc<PgPool>,
    cost: u32,
}

impl PgUserRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self::with_cost(pool, DEFAULT_COST)
    }

    /// Creates a repository that hashes with the given bcrypt cost.
    pub fn with_cost(pool: Arc<PgPool>, cost: u32) -> Self {
        Self { pool, cost }
    }
}

#[derive(sqlx::FromRow)]
struct CredentialRow {
    id: i64,
    hashed_password: String,
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn insert(&self, user: NewUser) -> Result<(), ModelError> {
        let hashed_password = hash_password(user.password, self.cost).await?;

        let result = sqlx::query(
            r#"
            INSERT INTO users (name, email, hashed_password, created)
            VALUES ($1, $2, $3, NOW())
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&hashed_password)
        .execute(self.pool.as_ref())
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation_on(&e, EMAIL_CONSTRAINT) => {
                Err(ModelError::DuplicateEmail)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn authenticate(&self, email: &str, password: &str) -> Result<i64, ModelError> {
        let row = sqlx::query_as::<_, CredentialRow>(
            r#"
            SELECT id, hashed_password
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(self.pool.as_ref())
        .await?;

        let Some(row) = row else {
            return Err(ModelError::InvalidCredentials);
        };

        if !verify_password(password.to_string(), row.hashed_password).await? {
            return Err(ModelError::InvalidCredentials);
        }

        Ok(row.id)
    }

    async fn exists(&self, id: i64) -> Result<bool, ModelError> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT true FROM users WHERE id = $1)")
                .bind(id)
                .fetch_one(self.pool.as_ref())
                .await?;

        Ok(exists)
    }

    async fn get(&self, id: i64) -> Result<User, ModelError> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, created
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?
        .ok_or(ModelError::NoRecord)
    }
}
