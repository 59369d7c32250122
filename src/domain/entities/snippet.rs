//! Snippet entity.

use chrono::{DateTime, Utc};

/// A stored text snippet.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Snippet {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created: DateTime<Utc>,
    pub expires: DateTime<Utc>,
}

impl Snippet {
    /// Creation time formatted for display, e.g. `17 Mar 2024 at 10:15`.
    pub fn created_display(&self) -> String {
        human_date(self.created)
    }

    /// Expiry time formatted for display.
    pub fn expires_display(&self) -> String {
        human_date(self.expires)
    }
}

/// Formats a timestamp the way every page shows dates.
pub fn human_date(t: DateTime<Utc>) -> String {
    t.format("%d %b %Y at %H:%M").to_string()
}

/// Input data for creating a snippet.
///
/// `expires_days` is the lifetime counted from the insert time.
#[derive(Debug, Clone)]
pub struct NewSnippet {
    pub title: String,
    pub content: String,
    pub expires_days: i32,
}
