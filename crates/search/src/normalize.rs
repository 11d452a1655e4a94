//! Query and candidate text normalization
//!
//! Both sides of a comparison go through the same pipeline: case-fold, then
//! collapse punctuation runs into single spaces. Package codes and unit
//! suffixes ("0603", "10k") are ordinary alphanumeric tokens and survive
//! normalization — stripping them would gut multi-keyword precision.

use once_cell::sync::Lazy;
use regex::Regex;

/// Anything that is not a letter or digit separates tokens
static SEPARATORS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^\p{L}\p{N}]+").expect("separator pattern is a valid regex")
});

/// Normalize text for comparison: lowercase, punctuation runs to single
/// spaces, trimmed.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    SEPARATORS.replace_all(&lowered, " ").trim().to_string()
}

/// Split a query into normalized whitespace-delimited tokens
pub fn tokenize(query: &str) -> Vec<String> {
    normalize(query)
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_lowercases() {
        assert_eq!(normalize("10K Resistor"), "10k resistor");
    }

    #[test]
    fn test_normalize_strips_punctuation() {
        assert_eq!(normalize("res,  10kΩ ±1% (0603)"), "res 10kω 1 0603");
    }

    #[test]
    fn test_package_codes_survive() {
        let tokens = tokenize("cap 100nF X7R 0402");
        assert!(tokens.contains(&"0402".to_string()));
        assert!(tokens.contains(&"x7r".to_string()));
    }

    #[test]
    fn test_tokenize_empty_query() {
        assert!(tokenize("  ,,, ").is_empty());
    }
}
