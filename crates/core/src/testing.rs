//! Test doubles for the store and provider seams.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::{CacheStore, Error, MemoryStore, SearchProvider, SearchRecord};

fn connection_lost() -> Error {
    Error::Database(tokio_rusqlite::Error::ConnectionClosed)
}

#[derive(Debug, Default)]
struct Faults {
    get: AtomicBool,
    keys: AtomicBool,
    set: AtomicBool,
    key_scans: AtomicUsize,
}

/// Memory store whose operations can be switched to fail.
#[derive(Debug, Clone, Default)]
pub(crate) struct FlakyStore {
    inner: MemoryStore,
    faults: Arc<Faults>,
}

impl FlakyStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn inner(&self) -> &MemoryStore {
        &self.inner
    }

    pub(crate) fn fail_get(&self, fail: bool) {
        self.faults.get.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn fail_keys(&self, fail: bool) {
        self.faults.keys.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn fail_set(&self, fail: bool) {
        self.faults.set.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn key_scans(&self) -> usize {
        self.faults.key_scans.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CacheStore for FlakyStore {
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), Error> {
        if self.faults.set.load(Ordering::SeqCst) {
            return Err(connection_lost());
        }
        self.inner.set(key, value, ttl).await
    }

    async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        if self.faults.get.load(Ordering::SeqCst) {
            return Err(connection_lost());
        }
        self.inner.get(key).await
    }

    async fn exists(&self, key: &str) -> Result<bool, Error> {
        if self.faults.get.load(Ordering::SeqCst) {
            return Err(connection_lost());
        }
        self.inner.exists(key).await
    }

    async fn delete(&self, key: &str) -> Result<bool, Error> {
        self.inner.delete(key).await
    }

    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, Error> {
        self.faults.key_scans.fetch_add(1, Ordering::SeqCst);
        if self.faults.keys.load(Ordering::SeqCst) {
            return Err(connection_lost());
        }
        self.inner.keys_with_prefix(prefix).await
    }
}

/// Provider returning a fixed record and counting calls.
#[derive(Debug, Clone)]
pub(crate) struct CountingProvider {
    record: Option<SearchRecord>,
    calls: Arc<AtomicUsize>,
    last_query: Arc<std::sync::Mutex<Option<(String, usize)>>>,
}

impl CountingProvider {
    pub(crate) fn returning(record: SearchRecord) -> Self {
        Self { record: Some(record), calls: Arc::default(), last_query: Arc::default() }
    }

    pub(crate) fn failing() -> Self {
        Self { record: None, calls: Arc::default(), last_query: Arc::default() }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn last_query(&self) -> Option<(String, usize)> {
        self.last_query.lock().ok().and_then(|q| q.clone())
    }
}

#[async_trait]
impl SearchProvider for CountingProvider {
    async fn search(&self, query: &str, limit: usize) -> Result<SearchRecord, Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_query.lock() {
            *last = Some((query.to_string(), limit));
        }
        self.record
            .clone()
            .ok_or_else(|| Error::Upstream("HTTP 503".into()))
    }
}
