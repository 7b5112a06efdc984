//! Cached search result record.

use serde::{Deserialize, Serialize};

/// Upstream search payload as stored in the cache.
///
/// Documents are kept opaque; the cache never inspects or mutates them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRecord {
    /// Total number of matches reported upstream.
    pub num_found: u64,
    /// Offset of the first returned document.
    #[serde(default)]
    pub start: u64,
    /// Whether `num_found` is exact rather than an estimate.
    #[serde(default)]
    pub num_found_exact: bool,
    /// Ranked result documents.
    #[serde(default)]
    pub docs: Vec<serde_json::Value>,
}

impl SearchRecord {
    /// Record starting at offset 0 whose count is not marked exact, the same
    /// as decoding `{"numFound": .., "docs": [..]}`.
    pub fn new(num_found: u64, docs: Vec<serde_json::Value>) -> Self {
        Self { num_found, docs, ..Default::default() }
    }

    /// Number of documents carried by this record.
    pub fn result_count(&self) -> usize {
        self.docs.len()
    }
}
