//! Approximate matching of a query against every cached search key.
//!
//! Two scoring methods are tried per stored key, in order:
//!
//! - **edit distance**: the whole normalized query is within
//!   `max_edit_distance` edits of the stored variant; score `1 / (d + 1)`
//! - **word overlap**: the share of query words that have a stored word within
//!   `max_word_distance` edits, over the larger word count, reaches
//!   `min_word_overlap`; score is that share
//!
//! Candidates are ranked by score, ties keeping the store's enumeration order.

use std::fmt;

use serde::{Deserialize, Serialize};
use strsim::levenshtein;

use super::Resolver;
use super::normalize::normalize;

/// Fuzzy matching thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Largest whole-query edit distance accepted as a match.
    #[serde(default = "default_max_edit_distance")]
    pub max_edit_distance: usize,

    /// Largest edit distance for two words to count as the same word.
    #[serde(default = "default_max_word_distance")]
    pub max_word_distance: usize,

    /// Minimum share of matching words for a word-overlap match.
    #[serde(default = "default_min_word_overlap")]
    pub min_word_overlap: f64,

    /// How many fuzzy candidates the resolver ranks per lookup.
    #[serde(default = "default_max_candidates")]
    pub max_candidates: usize,
}

fn default_max_edit_distance() -> usize {
    3
}

fn default_max_word_distance() -> usize {
    2
}

fn default_min_word_overlap() -> f64 {
    0.6
}

fn default_max_candidates() -> usize {
    5
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            max_edit_distance: default_max_edit_distance(),
            max_word_distance: default_max_word_distance(),
            min_word_overlap: default_min_word_overlap(),
            max_candidates: default_max_candidates(),
        }
    }
}

impl MatchConfig {
    /// Score a stored variant against a normalized query.
    ///
    /// `query_words` must be the whitespace-separated words of `query`.
    /// Returns `None` when neither method accepts the variant.
    pub fn score(&self, query: &str, query_words: &[&str], variant: &str) -> Option<(f64, MatchMethod)> {
        let distance = levenshtein(query, variant);
        if distance <= self.max_edit_distance {
            return Some((1.0 / (distance as f64 + 1.0), MatchMethod::EditDistance));
        }

        let stored_words: Vec<&str> = variant.split_whitespace().collect();
        let matched = query_words
            .iter()
            .filter(|query_word| {
                stored_words
                    .iter()
                    .any(|stored_word| levenshtein(query_word, stored_word) <= self.max_word_distance)
            })
            .count();

        let total = query_words.len().max(stored_words.len());
        if total == 0 {
            return None;
        }

        let ratio = matched as f64 / total as f64;
        (ratio >= self.min_word_overlap).then_some((ratio, MatchMethod::WordOverlap))
    }
}

/// How a fuzzy candidate was matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchMethod {
    EditDistance,
    WordOverlap,
}

impl MatchMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchMethod::EditDistance => "edit-distance",
            MatchMethod::WordOverlap => "word-overlap",
        }
    }
}

impl fmt::Display for MatchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A cached key that approximately matches the query.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateMatch {
    /// Full cache key.
    pub key: String,
    /// Variant portion of the key.
    pub variant: String,
    /// Similarity in `0.0..=1.0`, higher is closer.
    pub score: f64,
    pub method: MatchMethod,
}

impl Resolver {
    /// Rank cached keys similar to `query`, best first, at most `max_results`.
    ///
    /// Scans every key in the search namespace. A key whose variant equals the
    /// normalized query is skipped since exact lookup already covers it. Key
    /// enumeration failures are logged and yield no candidates.
    pub async fn fuzzy_match(&self, query: &str, max_results: usize) -> Vec<CandidateMatch> {
        let normalized = normalize(query);
        if normalized.is_empty() || max_results == 0 {
            return Vec::new();
        }

        let keys = match self.store.keys_with_prefix(self.keys.search_prefix()).await {
            Ok(keys) => keys,
            Err(e) => {
                tracing::warn!(error = %e, "failed to list cache keys for fuzzy matching");
                return Vec::new();
            }
        };

        let query_words: Vec<&str> = normalized.split_whitespace().collect();
        let scanned = keys.len();

        let mut candidates: Vec<CandidateMatch> = keys
            .into_iter()
            .filter_map(|key| {
                let variant = self.keys.variant_of(&key)?.to_string();
                if variant == normalized {
                    return None;
                }
                let (score, method) = self.matching.score(&normalized, &query_words, &variant)?;
                Some(CandidateMatch { key, variant, score, method })
            })
            .collect();

        candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
        candidates.truncate(max_results);

        tracing::debug!(query = %normalized, scanned, matches = candidates.len(), "fuzzy scan complete");

        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::ResolverConfig;
    use crate::testing::FlakyStore;
    use crate::{CacheStore, MemoryStore};
    use std::sync::Arc;
    use std::time::Duration;

    const HOUR: Duration = Duration::from_secs(3600);

    fn score(query: &str, variant: &str) -> Option<(f64, MatchMethod)> {
        let words: Vec<&str> = query.split_whitespace().collect();
        MatchConfig::default().score(query, &words, variant)
    }

    async fn resolver_with(variants: &[&str]) -> Resolver {
        let store = MemoryStore::new();
        for variant in variants {
            store.set(&format!("fuzzcache:search:{variant}"), "{}", HOUR).await.unwrap();
        }
        Resolver::new(Arc::new(store), ResolverConfig::default())
    }

    #[test]
    fn test_edit_distance_boundary() {
        assert_eq!(levenshtein("silmarillion", "silmarilxxxn"), 3);
        assert_eq!(levenshtein("silmarillion", "silmarilxxxx"), 4);

        assert_eq!(score("silmarillion", "silmarilxxxn"), Some((0.25, MatchMethod::EditDistance)));
        assert_eq!(score("silmarillion", "silmarilxxxx"), None);
    }

    #[test]
    fn test_edit_distance_score() {
        let (value, method) = score("lord of the rigns", "lord of the rings").unwrap();
        assert_eq!(method, MatchMethod::EditDistance);
        assert!((value - 1.0 / 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_word_overlap_accepts() {
        let (value, method) =
            score("harry potter philosophers stone", "harry potter and the philosophers stone").unwrap();
        assert_eq!(method, MatchMethod::WordOverlap);
        assert!((value - 4.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_word_overlap_tolerates_word_typos() {
        let (value, method) = score("hary poter goblet", "harry potter and goblet").unwrap();
        assert_eq!(method, MatchMethod::WordOverlap);
        assert!((value - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_word_overlap_rejects_below_threshold() {
        assert_eq!(score("the fellowship of the ring", "fellowship ring"), None);
    }

    #[test]
    fn test_word_overlap_exact_threshold() {
        // 3 of 5 words
        let (value, method) = score("alpha bravo charlie delta echo", "alpha bravo charlie").unwrap();
        assert_eq!(method, MatchMethod::WordOverlap);
        assert_eq!(value, 0.6);
    }

    #[test]
    fn test_custom_thresholds() {
        let strict =
            MatchConfig { max_edit_distance: 1, max_word_distance: 1, min_word_overlap: 0.9, ..Default::default() };
        let words = ["lord", "of", "the", "rigns"];
        assert_eq!(strict.score("lord of the rigns", &words, "lord of the rings"), None);
    }

    #[test]
    fn test_word_distance_boundary() {
        // whole strings are 4 apart, so only word overlap can accept
        assert_eq!(levenshtein("abcdef ghijkl", "abcdxy ghijzz"), 4);
        assert_eq!(levenshtein("abcdef", "abcdxy"), 2);
        assert_eq!(levenshtein("abcdef", "abcxyz"), 3);

        assert_eq!(score("abcdef ghijkl", "abcdxy ghijzz"), Some((1.0, MatchMethod::WordOverlap)));
        assert_eq!(score("abcdef ghijkl", "abcxyz ghijzz"), None);
    }

    #[test]
    fn test_word_distance_boundary_custom() {
        let config = MatchConfig { max_edit_distance: 1, max_word_distance: 1, ..Default::default() };
        let words = ["abcdef", "ghijkl"];

        assert_eq!(levenshtein("abcdef ghijkl", "abcdex ghijkz"), 2);
        assert_eq!(config.score("abcdef ghijkl", &words, "abcdex ghijkz"), Some((1.0, MatchMethod::WordOverlap)));
        assert_eq!(config.score("abcdef ghijkl", &words, "abcdxy ghijkz"), None);

        // two edits per word: accepted by the default, rejected here
        assert_eq!(config.score("abcdef ghijkl", &words, "abcdxy ghijzz"), None);
        assert_eq!(score("abcdef ghijkl", "abcdxy ghijzz"), Some((1.0, MatchMethod::WordOverlap)));
    }

    #[test]
    fn test_method_tags() {
        assert_eq!(MatchMethod::EditDistance.to_string(), "edit-distance");
        assert_eq!(serde_json::to_string(&MatchMethod::WordOverlap).unwrap(), r#""word-overlap""#);
    }

    #[tokio::test]
    async fn test_empty_store() {
        let resolver = resolver_with(&[]).await;
        assert!(resolver.fuzzy_match("dune", 5).await.is_empty());
    }

    #[tokio::test]
    async fn test_empty_query_skips_scan() {
        let store = FlakyStore::new();
        store.fail_keys(true);
        let resolver = Resolver::new(Arc::new(store.clone()), ResolverConfig::default());

        assert!(resolver.fuzzy_match("?!", 5).await.is_empty());
        assert_eq!(store.key_scans(), 0);
    }

    #[tokio::test]
    async fn test_skips_own_variant() {
        let resolver = resolver_with(&["dune"]).await;
        assert!(resolver.fuzzy_match("Dune!", 5).await.is_empty());
    }

    #[tokio::test]
    async fn test_ranking_is_stable() {
        let resolver = resolver_with(&["harry pot", "hary potter", "harry pottr"]).await;

        let matches = resolver.fuzzy_match("harry potter", 5).await;
        let variants: Vec<&str> = matches.iter().map(|m| m.variant.as_str()).collect();
        assert_eq!(variants, vec!["harry pottr", "hary potter", "harry pot"]);
        assert_eq!(matches[0].score, 0.5);
        assert_eq!(matches[0].key, "fuzzcache:search:harry pottr");
        assert_eq!(matches[2].score, 0.25);
    }

    #[tokio::test]
    async fn test_truncates_to_max_results() {
        let resolver = resolver_with(&["harry pot", "hary potter", "harry pottr"]).await;

        let matches = resolver.fuzzy_match("harry potter", 2).await;
        assert_eq!(matches.len(), 2);
        assert!(matches.iter().all(|m| m.score == 0.5));
    }

    #[tokio::test]
    async fn test_ignores_other_namespaces() {
        let store = MemoryStore::new();
        store.set("other:search:harry pottr", "{}", HOUR).await.unwrap();
        let resolver = Resolver::new(Arc::new(store), ResolverConfig::default());

        assert!(resolver.fuzzy_match("harry potter", 5).await.is_empty());
    }

    #[tokio::test]
    async fn test_key_listing_failure_yields_nothing() {
        let store = FlakyStore::new();
        store.inner().set("fuzzcache:search:harry pottr", "{}", HOUR).await.unwrap();
        store.fail_keys(true);
        let resolver = Resolver::new(Arc::new(store), ResolverConfig::default());

        assert!(resolver.fuzzy_match("harry potter", 5).await.is_empty());
    }
}
