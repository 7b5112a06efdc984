//! Upstream search provider seam.

use async_trait::async_trait;

use crate::{Error, SearchRecord};

/// A third-party search API consulted on cache misses.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Search for `query` (already normalized), returning at most `limit` documents.
    async fn search(&self, query: &str, limit: usize) -> Result<SearchRecord, Error>;
}
