//! OpenLibrary search response types.

use fuzzcache_core::SearchRecord;
use serde::Deserialize;

/// Raw body of `GET /search.json`.
///
/// Only the paging fields and the document list are kept; documents stay
/// opaque JSON.
#[derive(Debug, Deserialize)]
pub struct OpenLibraryResponse {
    #[serde(rename = "numFound")]
    pub num_found: u64,
    #[serde(default)]
    pub start: u64,
    #[serde(rename = "numFoundExact", default)]
    pub num_found_exact: bool,
    #[serde(default)]
    pub docs: Vec<serde_json::Value>,
}

impl From<OpenLibraryResponse> for SearchRecord {
    fn from(raw: OpenLibraryResponse) -> Self {
        SearchRecord { num_found: raw.num_found, start: raw.start, num_found_exact: raw.num_found_exact, docs: raw.docs }
    }
}
