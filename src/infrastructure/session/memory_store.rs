//! In-memory session store.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::store::{SessionError, SessionStore, SessionValues};

#[derive(Debug, Clone)]
struct Record {
    values: SessionValues,
    expires_at: DateTime<Utc>,
}

/// Session store that keeps records in process memory.
///
/// Records are lost on restart and are not shared between instances.
/// Suitable for tests and single-instance development runs.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    records: Arc<RwLock<HashMap<String, Record>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records, expired ones included.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self, token: &str) -> Result<Option<SessionValues>, SessionError> {
        let records = self.records.read().await;

        Ok(records
            .get(token)
            .filter(|r| r.expires_at > Utc::now())
            .map(|r| r.values.clone()))
    }

    async fn save(
        &self,
        token: &str,
        values: &SessionValues,
        expires_at: DateTime<Utc>,
    ) -> Result<(), SessionError> {
        self.records.write().await.insert(
            token.to_string(),
            Record {
                values: values.clone(),
                expires_at,
            },
        );
        Ok(())
    }

    async fn delete(&self, token: &str) -> Result<(), SessionError> {
        self.records.write().await.remove(token);
        Ok(())
    }

    async fn delete_expired(&self) -> Result<u64, SessionError> {
        let now = Utc::now();
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|_, r| r.expires_at > now);
        Ok((before - records.len()) as u64)
    }
}
