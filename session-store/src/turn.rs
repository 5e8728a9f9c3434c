//! Turn records as they are persisted in a session list.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Author of a turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Notices emitted by the backend itself (e.g. session creation).
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// A single immutable chat turn.
///
/// Serialized as `{"role": "user", "text": "...", "ts": 1728000000000}` where
/// `ts` is the creation time in epoch milliseconds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub text: String,
    pub ts: i64,
}

impl Turn {
    /// Creates a turn stamped with the current time.
    pub fn now(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            ts: Utc::now().timestamp_millis(),
        }
    }
}
