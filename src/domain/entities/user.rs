//! User entity.

use chrono::{DateTime, Utc};

use super::snippet::human_date;

/// A registered user.
///
/// The password hash is never loaded into this struct; it stays inside the
/// persistence layer.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub created: DateTime<Utc>,
}

impl User {
    pub fn created_display(&self) -> String {
        human_date(self.created)
    }
}

/// Input data for registering a user. `password` is the plaintext password.
#[derive(Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}
