//! In-process session store with the same semantics as the Redis one.

use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::config::SESSION_TTL_SECS;
use crate::errors::SessionStoreError;
use crate::store::{SessionStore, history_key};
use crate::turn::{Role, Turn};

struct Entry {
    turns: Vec<Turn>,
    expires_at: Instant,
}

/// Session store kept in a process-local map. Expiry slides on every append.
pub struct InMemorySessionStore {
    ttl: Duration,
    lists: RwLock<HashMap<String, Entry>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::with_ttl(Duration::from_secs(SESSION_TTL_SECS))
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            lists: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn append_turn(
        &self,
        session_id: &str,
        role: Role,
        text: &str,
    ) -> Result<(), SessionStoreError> {
        let now = Instant::now();
        let mut lists = self.lists.write().await;
        let entry = lists.entry(history_key(session_id)).or_insert_with(|| Entry {
            turns: Vec::new(),
            expires_at: now,
        });
        if entry.expires_at <= now {
            entry.turns.clear();
        }
        entry.turns.push(Turn::now(role, text));
        entry.expires_at = now + self.ttl;
        Ok(())
    }

    async fn list_turns(&self, session_id: &str) -> Result<Vec<Turn>, SessionStoreError> {
        let lists = self.lists.read().await;
        Ok(lists
            .get(&history_key(session_id))
            .filter(|e| e.expires_at > Instant::now())
            .map(|e| e.turns.clone())
            .unwrap_or_default())
    }

    async fn clear_session(&self, session_id: &str) -> Result<(), SessionStoreError> {
        self.lists.write().await.remove(&history_key(session_id));
        Ok(())
    }
}
