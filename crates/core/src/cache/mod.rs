//! Key-value cache stores for search results.
//!
//! The resolver talks to a [`CacheStore`]; two backends are provided:
//!
//! - [`CacheDb`]: persistent SQLite storage via tokio-rusqlite, with automatic
//!   schema migrations, WAL mode and expiry/LRU purges
//! - [`MemoryStore`]: process-local map with the same expiry semantics

pub mod connection;
pub mod entries;
pub mod memory;
pub mod migrations;

use std::time::Duration;

use async_trait::async_trait;

use crate::Error;

pub use connection::CacheDb;
pub use memory::MemoryStore;

/// Key-value store with per-entry expiry.
///
/// Expired entries must be invisible to every read operation. A missing key is
/// `Ok(None)` / `Ok(false)`, never an error.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Store `value` under `key`, replacing any previous value, expiring after `ttl`.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), Error>;

    /// Fetch the live value stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<String>, Error>;

    /// Check whether a live value is stored under `key`.
    async fn exists(&self, key: &str) -> Result<bool, Error>;

    /// Remove `key`. Returns whether an entry was removed.
    async fn delete(&self, key: &str) -> Result<bool, Error>;

    /// List live keys starting with `prefix`, in the store's enumeration order.
    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, Error>;
}
