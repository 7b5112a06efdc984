//! In-process cache store.
//!
//! Entries live in a sorted map guarded by an async lock, so key enumeration
//! is lexicographic. Expired entries stay in the map until overwritten or
//! purged but are never returned.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::CacheStore;
use crate::Error;

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|at| at > now)
    }
}

/// Cache store kept in process memory.
///
/// Cloning shares the underlying map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<BTreeMap<String, Entry>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop expired entries, returning how many were removed.
    pub async fn purge_expired(&self) -> u64 {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.is_live(now));
        (before - entries.len()) as u64
    }

    /// Number of stored entries, live or expired.
    pub async fn entry_count(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), Error> {
        let entry = Entry { value: value.to_string(), expires_at: Instant::now().checked_add(ttl) };
        self.entries.write().await.insert(key.to_string(), entry);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        let now = Instant::now();
        let entries = self.entries.read().await;
        Ok(entries
            .get(key)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.value.clone()))
    }

    async fn exists(&self, key: &str) -> Result<bool, Error> {
        let now = Instant::now();
        let entries = self.entries.read().await;
        Ok(entries.get(key).is_some_and(|entry| entry.is_live(now)))
    }

    async fn delete(&self, key: &str) -> Result<bool, Error> {
        Ok(self.entries.write().await.remove(key).is_some())
    }

    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, Error> {
        let now = Instant::now();
        let entries = self.entries.read().await;
        Ok(entries
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .filter(|(_, entry)| entry.is_live(now))
            .map(|(key, _)| key.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR: Duration = Duration::from_secs(3600);

    #[tokio::test]
    async fn test_set_get_exists() {
        let store = MemoryStore::new();
        store.set("p:search:dune", "{}", HOUR).await.unwrap();

        assert_eq!(store.get("p:search:dune").await.unwrap().as_deref(), Some("{}"));
        assert!(store.exists("p:search:dune").await.unwrap());
        assert!(store.get("p:search:missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_expired_entries_are_invisible() {
        let store = MemoryStore::new();
        store.set("p:search:gone", "{}", Duration::ZERO).await.unwrap();
        store.set("p:search:kept", "{}", HOUR).await.unwrap();

        assert!(store.get("p:search:gone").await.unwrap().is_none());
        assert!(!store.exists("p:search:gone").await.unwrap());
        assert_eq!(store.keys_with_prefix("p:search:").await.unwrap(), vec!["p:search:kept".to_string()]);

        assert_eq!(store.purge_expired().await, 1);
        assert_eq!(store.entry_count().await, 1);
    }

    #[tokio::test]
    async fn test_keys_with_prefix() {
        let store = MemoryStore::new();
        store.set("p:search:b", "{}", HOUR).await.unwrap();
        store.set("p:other:a", "{}", HOUR).await.unwrap();
        store.set("p:search:a", "{}", HOUR).await.unwrap();
        store.set("q:search:a", "{}", HOUR).await.unwrap();

        let keys = store.keys_with_prefix("p:search:").await.unwrap();
        assert_eq!(keys, vec!["p:search:a".to_string(), "p:search:b".to_string()]);
    }

    #[tokio::test]
    async fn test_delete() {
        let store = MemoryStore::new();
        store.set("key", "value", HOUR).await.unwrap();

        assert!(store.delete("key").await.unwrap());
        assert!(!store.delete("key").await.unwrap());
    }
}
