//! Core types and shared functionality for fuzzcache.
//!
//! This crate provides:
//! - Fuzzy cache-key resolution (normalization, key variations, approximate matching)
//! - Cache store trait with SQLite and in-memory backends
//! - The search service that ties the resolver to an upstream provider
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;
pub mod provider;
pub mod record;
pub mod resolve;
pub mod service;

#[cfg(test)]
pub(crate) mod testing;

pub use cache::{CacheDb, CacheStore, MemoryStore};
pub use config::AppConfig;
pub use error::Error;
pub use provider::SearchProvider;
pub use record::SearchRecord;
pub use resolve::{CandidateMatch, MatchConfig, MatchMethod, ResolveOutcome, Resolver, ResolverConfig};
pub use service::{SearchMetrics, SearchResponse, SearchService};
