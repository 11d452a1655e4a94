//! Fuzzy matching engine for bommatch
//!
//! This crate scores BOM free text against catalog candidates:
//! - Shared normalization for queries and candidate text
//! - Grapheme-aware Levenshtein distance and windowed partial ratios
//! - AND-semantics multi-token matching with price/stock tie-breaks
//!
//! Enable the `parallel` feature (default) to score large candidate pages
//! across threads with rayon.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

mod matcher;
mod normalize;
mod similarity;

pub use matcher::{FuzzyMatcher, MatcherConfig};
pub use normalize::{normalize, tokenize};
pub use similarity::{levenshtein_distance, partial_ratio, ratio};
