//! OpenLibrary client error types.

use std::sync::Arc;

/// Errors from the OpenLibrary search client.
#[derive(Debug, thiserror::Error)]
pub enum OpenLibraryError {
    /// Invalid search query.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// Invalid result limit.
    #[error("invalid limit {0}: must be 1-100")]
    InvalidLimit(usize),

    /// Base URL could not be parsed.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// Rate limited by OpenLibrary.
    #[error("rate limited: too many requests")]
    RateLimited,

    /// HTTP error response.
    #[error("HTTP error: {status}")]
    HttpError { status: u16 },

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Response parse error.
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for OpenLibraryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { OpenLibraryError::Timeout } else { OpenLibraryError::Network(Arc::new(err)) }
    }
}

impl From<OpenLibraryError> for fuzzcache_core::Error {
    fn from(err: OpenLibraryError) -> Self {
        use fuzzcache_core::Error;

        match err {
            OpenLibraryError::InvalidQuery(msg) => Error::InvalidInput(msg),
            OpenLibraryError::InvalidLimit(_) => Error::InvalidInput(err.to_string()),
            OpenLibraryError::RateLimited => Error::UpstreamRateLimited(err.to_string()),
            OpenLibraryError::Timeout => Error::UpstreamTimeout(err.to_string()),
            OpenLibraryError::HttpError { status } => Error::Upstream(format!("HTTP {status}")),
            _ => Error::Upstream(err.to_string()),
        }
    }
}
