//! Query normalization.

/// Normalize a search query for cache keying.
///
/// Lower-cases, drops every character that is not a letter, digit or
/// whitespace, and collapses whitespace runs to a single space with no
/// leading or trailing space. The result is empty when the query has no
/// searchable content. Normalizing twice yields the same string.
pub fn normalize(query: &str) -> String {
    let cleaned: String = query
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();

    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercase_and_trim() {
        assert_eq!(normalize("  Project Hail Mary  "), "project hail mary");
    }

    #[test]
    fn test_punctuation_insensitive() {
        assert_eq!(normalize("Harry, Potter!!"), normalize("harry potter"));
        assert_eq!(normalize("Harry, Potter!!"), "harry potter");
    }

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(normalize("lord\t of   the\nrings"), "lord of the rings");
    }

    #[test]
    fn test_stripping_exposes_no_edge_spaces() {
        assert_eq!(normalize("dune !"), "dune");
        assert_eq!(normalize("- dune - messiah -"), "dune messiah");
    }

    #[test]
    fn test_underscore_is_punctuation() {
        assert_eq!(normalize("snake_case"), "snakecase");
    }

    #[test]
    fn test_keeps_unicode_letters_and_digits() {
        assert_eq!(normalize("Les Misérables 1862"), "les misérables 1862");
    }

    #[test]
    fn test_no_searchable_content() {
        assert_eq!(normalize("?!... --"), "");
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn test_idempotent() {
        let samples =
            ["Harry, Potter!!", "  dune !", "Les Misérables", "a  b\tc", "?!", "İstanbul Ǆ", "snake_case 42", ""];
        for sample in samples {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "normalize not idempotent for {sample:?}");
        }
    }
}
