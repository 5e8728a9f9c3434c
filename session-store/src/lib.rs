//! Chat session history backed by a key-value store.
//!
//! Each session owns one append-only list of [`Turn`]s stored under
//! `sess:{id}:history`. Every append slides the list expiry to
//! [`SESSION_TTL_SECS`] from now. Unknown or expired sessions read as empty.
//!
//! Two implementations of [`SessionStore`] are provided:
//! - [`RedisSessionStore`] for production (`redis://` or `rediss://`).
//! - [`InMemorySessionStore`] for tests and local runs without Redis.

pub mod config;
pub mod errors;
pub mod memory_store;
pub mod redis_store;
pub mod store;
pub mod turn;

pub use config::{SESSION_TTL_SECS, SessionStoreConfig};
pub use errors::SessionStoreError;
pub use memory_store::InMemorySessionStore;
pub use redis_store::RedisSessionStore;
pub use store::{SessionStore, history_key, new_session_id};
pub use turn::{Role, Turn};
