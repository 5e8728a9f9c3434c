//! Redis-backed session store.
//!
//! Layout: one list per session under `sess:{id}:history`, entries are
//! JSON-encoded [`Turn`]s. Append is `RPUSH` + `EXPIRE` in a single `MULTI`
//! block so a turn and its expiry land together.

use async_trait::async_trait;
use redis::{AsyncCommands, aio::ConnectionManager};
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::config::SessionStoreConfig;
use crate::errors::SessionStoreError;
use crate::store::{SessionStore, history_key};
use crate::turn::{Role, Turn};

/// Session store over a multiplexed, auto-reconnecting Redis connection.
///
/// The connection is opened lazily on first use, so the process can start
/// while Redis is still down; calls made meanwhile fail with
/// [`SessionStoreError::Unavailable`].
pub struct RedisSessionStore {
    client: redis::Client,
    conn: OnceCell<ConnectionManager>,
    ttl_secs: u64,
}

impl RedisSessionStore {
    /// Creates a store from validated settings. Does not connect yet.
    ///
    /// # Errors
    /// [`SessionStoreError::Config`] if the URL is invalid.
    pub fn new(cfg: &SessionStoreConfig) -> Result<Self, SessionStoreError> {
        cfg.validate()?;
        let client = redis::Client::open(cfg.url.as_str())
            .map_err(|e| SessionStoreError::Config(e.to_string()))?;

        info!(
            tls = cfg.tls,
            ttl_secs = cfg.ttl_secs,
            "RedisSessionStore initialized"
        );

        Ok(Self {
            client,
            conn: OnceCell::new(),
            ttl_secs: cfg.ttl_secs,
        })
    }

    async fn connection(&self) -> Result<ConnectionManager, SessionStoreError> {
        let conn = self
            .conn
            .get_or_try_init(|| async {
                debug!("opening redis connection");
                ConnectionManager::new(self.client.clone()).await
            })
            .await?;
        Ok(conn.clone())
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn append_turn(
        &self,
        session_id: &str,
        role: Role,
        text: &str,
    ) -> Result<(), SessionStoreError> {
        let key = history_key(session_id);
        let payload = serde_json::to_string(&Turn::now(role, text))?;
        let mut conn = self.connection().await?;

        redis::pipe()
            .atomic()
            .rpush(&key, payload)
            .ignore()
            .expire(&key, self.ttl_secs as i64)
            .ignore()
            .query_async::<()>(&mut conn)
            .await?;

        debug!(%key, role = role.as_str(), text_len = text.len(), "turn appended");
        Ok(())
    }

    async fn list_turns(&self, session_id: &str) -> Result<Vec<Turn>, SessionStoreError> {
        let key = history_key(session_id);
        let mut conn = self.connection().await?;
        let raw: Vec<String> = conn.lrange(&key, 0, -1).await?;

        let turns = decode_turns(&key, raw);
        debug!(%key, turns = turns.len(), "history loaded");
        Ok(turns)
    }

    async fn clear_session(&self, session_id: &str) -> Result<(), SessionStoreError> {
        let key = history_key(session_id);
        let mut conn = self.connection().await?;
        let removed: i64 = conn.del(&key).await?;
        debug!(%key, removed, "history cleared");
        Ok(())
    }
}

/// Decodes stored list entries in order; entries that are not valid turns are skipped.
fn decode_turns(key: &str, raw: Vec<String>) -> Vec<Turn> {
    raw.into_iter()
        .filter_map(|entry| match serde_json::from_str::<Turn>(&entry) {
            Ok(turn) => Some(turn),
            Err(e) => {
                warn!(%key, error = %e, "skipping undecodable turn record");
                None
            }
        })
        .collect()
}
