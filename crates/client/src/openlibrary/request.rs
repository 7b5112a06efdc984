//! OpenLibrary search request parameters and validation.

use serde::Serialize;

use super::OpenLibraryError;

/// Most results OpenLibrary is asked for in one request.
pub const MAX_LIMIT: usize = 100;

/// Longest query accepted, in characters.
const MAX_QUERY_CHARS: usize = 400;

/// Query parameters for `GET /search.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchRequest {
    /// Free-text query.
    pub q: String,
    /// Number of documents to return (1-100).
    pub limit: usize,
}

impl SearchRequest {
    pub fn new(q: impl Into<String>, limit: usize) -> Self {
        Self { q: q.into(), limit }
    }

    /// Validate the request parameters.
    pub fn validate(&self) -> Result<(), OpenLibraryError> {
        if self.q.trim().is_empty() {
            return Err(OpenLibraryError::InvalidQuery("query cannot be empty".to_string()));
        }

        let chars = self.q.chars().count();
        if chars > MAX_QUERY_CHARS {
            return Err(OpenLibraryError::InvalidQuery(format!(
                "query too long: {chars} chars (max {MAX_QUERY_CHARS})"
            )));
        }

        if !(1..=MAX_LIMIT).contains(&self.limit) {
            return Err(OpenLibraryError::InvalidLimit(self.limit));
        }

        Ok(())
    }
}
