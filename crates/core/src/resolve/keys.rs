//! Cache key namespace.

/// Builds and parses `<prefix>:search:<variant>` cache keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySpace {
    search_prefix: String,
}

impl KeySpace {
    pub fn new(prefix: &str) -> Self {
        Self { search_prefix: format!("{prefix}:search:") }
    }

    /// The `<prefix>:search:` namespace every search key starts with.
    pub fn search_prefix(&self) -> &str {
        &self.search_prefix
    }

    /// Full cache key for a query variant.
    pub fn key(&self, variant: &str) -> String {
        format!("{}{variant}", self.search_prefix)
    }

    /// Variant portion of a key in this namespace.
    pub fn variant_of<'a>(&self, key: &'a str) -> Option<&'a str> {
        key.strip_prefix(self.search_prefix.as_str())
    }
}
