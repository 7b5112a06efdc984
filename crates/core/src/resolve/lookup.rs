//! Exact lookup over the deterministic key variations.

use super::Resolver;
use crate::SearchRecord;

/// A cached record found under one of the query's variations.
#[derive(Debug, Clone, PartialEq)]
pub struct ExactMatch {
    pub key: String,
    pub variant: String,
    pub record: SearchRecord,
}

impl Resolver {
    /// Try each variation in order and return the first cached record.
    ///
    /// A store error on one variation is logged and treated as a miss for
    /// that variation only; the remaining variations are still tried.
    pub async fn lookup_exact(&self, variants: &[String]) -> Option<ExactMatch> {
        for variant in variants {
            let key = self.keys.key(variant);
            match self.fetch_record(&key).await {
                Ok(Some(record)) => return Some(ExactMatch { key, variant: variant.clone(), record }),
                Ok(None) => tracing::debug!(key = %key, "no cache entry for variation"),
                Err(e) => tracing::warn!(key = %key, error = %e, "cache lookup failed; treating as miss"),
            }
        }
        None
    }
}
