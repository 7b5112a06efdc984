//! Upstream search providers for fuzzcache.
//!
//! This crate provides the OpenLibrary search client used to answer cache
//! misses. It implements `fuzzcache_core::SearchProvider`.

pub mod openlibrary;

pub use openlibrary::{OpenLibraryClient, OpenLibraryConfig, OpenLibraryError, OpenLibraryResponse, SearchRequest};
