//! Deterministic cache-key variations of a query.

use super::normalize::normalize;

/// Words of this many characters or fewer are dropped by the long-words variation.
const SHORT_WORD_MAX_CHARS: usize = 3;

/// Generate the cache-key variations for a query, in lookup priority order.
///
/// 1. the normalized query (the canonical key)
/// 2. its words sorted lexicographically
/// 3. its words longer than three characters, if any
/// 4. its words with all spaces removed
///
/// Duplicates and empty strings are dropped, so a query with no searchable
/// content yields no variations. The canonical form is always first.
pub fn variations(query: &str) -> Vec<String> {
    let normalized = normalize(query);
    if normalized.is_empty() {
        return Vec::new();
    }

    let words: Vec<&str> = normalized.split(' ').collect();

    let mut sorted = words.clone();
    sorted.sort_unstable();

    let long_words: Vec<&str> = words
        .iter()
        .copied()
        .filter(|word| word.chars().count() > SHORT_WORD_MAX_CHARS)
        .collect();

    let mut candidates = vec![normalized.clone(), sorted.join(" ")];
    if !long_words.is_empty() {
        candidates.push(long_words.join(" "));
    }
    candidates.push(words.concat());

    let mut result: Vec<String> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if !candidate.is_empty() && !result.contains(&candidate) {
            result.push(candidate);
        }
    }
    result
}
