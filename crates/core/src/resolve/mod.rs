//! Fuzzy cache-key resolution.
//!
//! A raw query is normalized, its deterministic key variations are looked up
//! in priority order, and on a total miss every cached key is scored for
//! approximate similarity. Misses are written back under the canonical key
//! (the normalized query) so later variations of the same query converge on
//! one entry.

mod keys;
mod lookup;
mod matcher;
mod normalize;
mod variations;

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::{CacheStore, Error, SearchRecord};

pub use keys::KeySpace;
pub use lookup::ExactMatch;
pub use matcher::{CandidateMatch, MatchConfig, MatchMethod};
pub use normalize::normalize;
pub use variations::variations;

/// Construction parameters for a [`Resolver`].
#[derive(Debug, Clone, PartialEq)]
pub struct ResolverConfig {
    /// Namespace prefix; keys look like `<key_prefix>:search:<variant>`.
    pub key_prefix: String,
    /// TTL requested for write-backs.
    pub ttl: Duration,
    pub matching: MatchConfig,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self { key_prefix: "fuzzcache".into(), ttl: Duration::from_secs(1800), matching: MatchConfig::default() }
    }
}

/// Result of resolving a query against the cache.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolveOutcome {
    /// Found under one of the query's deterministic variations.
    ExactHit { record: SearchRecord, matched_variant: String },
    /// Found by approximate matching against another cached query.
    FuzzyHit { record: SearchRecord, matched_variant: String, score: f64, method: MatchMethod },
    /// Nothing usable cached; `canonical` is the key to fetch and write back under.
    Miss { canonical: String },
}

impl ResolveOutcome {
    pub fn is_hit(&self) -> bool {
        !matches!(self, ResolveOutcome::Miss { .. })
    }

    /// The cached record, if this outcome is a hit.
    pub fn record(&self) -> Option<&SearchRecord> {
        match self {
            ResolveOutcome::ExactHit { record, .. } | ResolveOutcome::FuzzyHit { record, .. } => Some(record),
            ResolveOutcome::Miss { .. } => None,
        }
    }
}

/// Resolves queries to cached search records.
///
/// Holds no per-request state; clones share the same store.
#[derive(Clone)]
pub struct Resolver {
    store: Arc<dyn CacheStore>,
    keys: KeySpace,
    ttl: Duration,
    matching: MatchConfig,
}

impl Resolver {
    pub fn new(store: Arc<dyn CacheStore>, config: ResolverConfig) -> Self {
        Self { store, keys: KeySpace::new(&config.key_prefix), ttl: config.ttl, matching: config.matching }
    }

    /// TTL requested for write-backs.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn key_space(&self) -> &KeySpace {
        &self.keys
    }

    /// Resolve a raw query: exact variations first, then fuzzy candidates.
    ///
    /// Store failures never surface here; they degrade to a miss.
    pub async fn resolve(&self, raw_query: &str) -> ResolveOutcome {
        let start = Instant::now();
        let canonical = normalize(raw_query);
        if canonical.is_empty() {
            tracing::debug!(query = raw_query, "query has no searchable content");
            return ResolveOutcome::Miss { canonical };
        }

        let variants = variations(&canonical);
        tracing::debug!(query = raw_query, variations = ?variants, "trying cache key variations");

        if let Some(hit) = self.lookup_exact(&variants).await {
            tracing::info!(
                query = raw_query,
                matched_variation = %hit.variant,
                cache_key = %hit.key,
                num_results = hit.record.result_count(),
                lookup_ms = start.elapsed().as_millis() as u64,
                "cache hit"
            );
            return ResolveOutcome::ExactHit { record: hit.record, matched_variant: hit.variant };
        }

        let candidates = self.fuzzy_match(&canonical, self.matching.max_candidates).await;
        if let Some(best) = candidates.first() {
            tracing::debug!(
                num_matches = candidates.len(),
                best_match = %best.variant,
                score = best.score,
                method = %best.method,
                "found fuzzy candidates"
            );

            match self.fetch_record(&best.key).await {
                Ok(Some(record)) => {
                    tracing::info!(
                        query = raw_query,
                        matched_query = %best.variant,
                        similarity_score = best.score,
                        match_method = %best.method,
                        num_results = record.result_count(),
                        lookup_ms = start.elapsed().as_millis() as u64,
                        "cache hit (fuzzy match)"
                    );
                    return ResolveOutcome::FuzzyHit {
                        record,
                        matched_variant: best.variant.clone(),
                        score: best.score,
                        method: best.method,
                    };
                }
                Ok(None) => tracing::debug!(key = %best.key, "fuzzy candidate expired before fetch"),
                Err(e) => tracing::warn!(key = %best.key, error = %e, "cache lookup failed; treating as miss"),
            }
        }

        tracing::info!(
            query = raw_query,
            variations_tried = variants.len(),
            fuzzy_matches_found = candidates.len(),
            lookup_ms = start.elapsed().as_millis() as u64,
            "cache miss"
        );

        ResolveOutcome::Miss { canonical }
    }

    /// Store a freshly fetched record under the canonical key for `query`.
    ///
    /// `query` is normalized again, so passing the raw query or the canonical
    /// form writes the same key. Returns the key written.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if the query has no searchable content,
    /// or the store's error if the write fails.
    pub async fn record_miss(&self, query: &str, record: &SearchRecord, ttl: Duration) -> Result<String, Error> {
        let canonical = normalize(query);
        if canonical.is_empty() {
            return Err(Error::InvalidInput("query has no searchable content".into()));
        }

        let start = Instant::now();
        let key = self.keys.key(&canonical);
        let value = serde_json::to_string(record)?;
        self.store.set(&key, &value, ttl).await?;

        tracing::info!(
            key = %key,
            ttl_secs = ttl.as_secs(),
            cache_write_ms = start.elapsed().as_millis() as u64,
            "result cached"
        );

        Ok(key)
    }

    async fn fetch_record(&self, key: &str) -> Result<Option<SearchRecord>, Error> {
        match self.store.get(key).await? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }
}
