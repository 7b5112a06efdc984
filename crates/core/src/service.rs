//! End-to-end search flow: resolve against the cache, fall back to the
//! upstream provider on a miss, and write the fresh result back.

use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::resolve::{MatchMethod, ResolveOutcome, Resolver};
use crate::{Error, SearchProvider, SearchRecord};

/// Response returned for every search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    /// The query as the caller sent it.
    pub query: String,
    pub num_found: u64,
    pub results: Vec<serde_json::Value>,
    /// Served from the cache.
    pub cached: bool,
    /// Served from a different cached query via approximate matching.
    pub fuzzy_match: bool,
    /// Variation or cached query the result came from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similarity_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_method: Option<MatchMethod>,
    pub response_time_ms: u64,
    /// Timing breakdown, present only when the upstream provider was called.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<SearchMetrics>,
}

/// Where the time went on an upstream search.
///
/// `api_call_ms` covers the request and decoding the response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMetrics {
    pub api_call_ms: u64,
    pub cache_write_ms: u64,
    pub total_ms: u64,
}

impl SearchResponse {
    fn from_record(query: &str, record: SearchRecord, started: Instant) -> Self {
        Self {
            query: query.to_string(),
            num_found: record.num_found,
            results: record.docs,
            cached: false,
            fuzzy_match: false,
            matched_query: None,
            similarity_score: None,
            match_method: None,
            response_time_ms: started.elapsed().as_millis() as u64,
            metrics: None,
        }
    }
}

/// Cache-fronted search over a [`SearchProvider`].
#[derive(Clone)]
pub struct SearchService {
    resolver: Resolver,
    provider: Arc<dyn SearchProvider>,
    limit: usize,
}

impl SearchService {
    /// `limit` is the number of results requested from the provider on a miss.
    pub fn new(resolver: Resolver, provider: Arc<dyn SearchProvider>, limit: usize) -> Self {
        Self { resolver, provider, limit }
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Answer a search query.
    ///
    /// # Errors
    ///
    /// `Error::InvalidInput` for an empty query or one with no letters or
    /// digits. Provider errors are returned as-is. Cache failures are logged
    /// and never fail the request.
    pub async fn search(&self, raw_query: &str) -> Result<SearchResponse, Error> {
        let started = Instant::now();
        if raw_query.trim().is_empty() {
            return Err(Error::InvalidInput("query cannot be empty".into()));
        }

        let canonical = match self.resolver.resolve(raw_query).await {
            ResolveOutcome::ExactHit { record, matched_variant } => {
                let mut response = SearchResponse::from_record(raw_query, record, started);
                response.cached = true;
                response.matched_query = Some(matched_variant);
                return Ok(response);
            }
            ResolveOutcome::FuzzyHit { record, matched_variant, score, method } => {
                let mut response = SearchResponse::from_record(raw_query, record, started);
                response.cached = true;
                response.fuzzy_match = true;
                response.matched_query = Some(matched_variant);
                response.similarity_score = Some(score);
                response.match_method = Some(method);
                return Ok(response);
            }
            ResolveOutcome::Miss { canonical } => canonical,
        };

        if canonical.is_empty() {
            return Err(Error::InvalidInput(format!("query has no searchable content: {raw_query:?}")));
        }

        let upstream_start = Instant::now();
        let record = self.provider.search(&canonical, self.limit).await?;
        let api_call_ms = upstream_start.elapsed().as_millis() as u64;
        tracing::info!(query = %canonical, num_found = record.num_found, api_call_ms, "upstream search complete");

        let write_start = Instant::now();
        if let Err(e) = self.resolver.record_miss(&canonical, &record, self.resolver.ttl()).await {
            tracing::warn!(query = %canonical, error = %e, "failed to cache search result");
        }
        let cache_write_ms = write_start.elapsed().as_millis() as u64;

        let mut response = SearchResponse::from_record(raw_query, record, started);
        response.metrics =
            Some(SearchMetrics { api_call_ms, cache_write_ms, total_ms: response.response_time_ms });
        Ok(response)
    }
}
