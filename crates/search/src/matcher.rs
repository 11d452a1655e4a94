//! Fuzzy matcher with AND semantics across query tokens
//!
//! A candidate is eligible only if *every* query token clears the
//! similarity threshold somewhere in the candidate's searchable text. This
//! makes a two-word query far stricter than either word alone: "10K
//! resistor" demands both a value and a part family, not just one of them.

use crate::normalize::{normalize, tokenize};
use crate::similarity::partial_ratio;
use bommatch_model::{CatalogItem, MatchCandidate, MatchedField};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Matcher tuning knobs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatcherConfig {
    /// Minimum per-token similarity (0–100) for a candidate to qualify
    pub threshold: u32,
    /// Cap on alternatives surfaced alongside the best candidate
    pub max_alternatives: usize,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            threshold: 70,
            max_alternatives: 5,
        }
    }
}

/// Scores and ranks catalog candidates against BOM text.
///
/// `rank` is a pure function of its inputs; the matcher holds configuration
/// only, so identical calls always produce identical output.
#[derive(Debug, Clone, Default)]
pub struct FuzzyMatcher {
    config: MatcherConfig,
}

impl FuzzyMatcher {
    /// Create a matcher with the given configuration
    pub fn new(config: MatcherConfig) -> Self {
        Self { config }
    }

    /// Create a matcher with a custom threshold and default limits
    pub fn with_threshold(threshold: u32) -> Self {
        Self {
            config: MatcherConfig {
                threshold,
                ..MatcherConfig::default()
            },
        }
    }

    /// The active configuration
    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Rank `candidates` against `query`, best first.
    ///
    /// Eligibility: every query token must reach the threshold against the
    /// candidate's normalized model + description + brand text. Candidate
    /// score is the mean of per-token best similarities. Ordering: score
    /// descending, then cheapest bulk price (unpriced items last), then
    /// stock descending, then part number for a stable total order.
    ///
    /// Below-threshold candidates are excluded entirely. An empty query or
    /// empty candidate slice yields an empty ranking, never an error.
    pub fn rank(&self, query: &str, candidates: &[CatalogItem]) -> Vec<MatchCandidate> {
        let tokens = tokenize(query);
        if tokens.is_empty() || candidates.is_empty() {
            return Vec::new();
        }

        let threshold = f64::from(self.config.threshold);
        let score_one = |item: &CatalogItem| score_candidate(&tokens, threshold, item);

        #[cfg(feature = "parallel")]
        let mut eligible: Vec<MatchCandidate> =
            candidates.par_iter().filter_map(score_one).collect();

        #[cfg(not(feature = "parallel"))]
        let mut eligible: Vec<MatchCandidate> =
            candidates.iter().filter_map(score_one).collect();

        eligible.sort_by(rank_order);

        debug!(
            query = %query,
            candidates = candidates.len(),
            eligible = eligible.len(),
            "ranked candidates"
        );

        eligible
    }
}

/// Score a single candidate, or `None` when any token misses the threshold
fn score_candidate(
    tokens: &[String],
    threshold: f64,
    item: &CatalogItem,
) -> Option<MatchCandidate> {
    let text = normalize(&item.searchable_text());

    let mut total = 0.0;
    for token in tokens {
        let similarity = partial_ratio(token, &text);
        if similarity < threshold {
            return None;
        }
        total += similarity;
    }
    let score = total / tokens.len() as f64;

    Some(MatchCandidate {
        matched_fields: matched_fields(tokens, threshold, item),
        item: item.clone(),
        score,
    })
}

/// Which individual fields satisfy the whole query on their own
fn matched_fields(tokens: &[String], threshold: f64, item: &CatalogItem) -> BTreeSet<MatchedField> {
    let fields = [
        (MatchedField::Model, item.model.as_str()),
        (MatchedField::Description, item.description.as_str()),
        (MatchedField::Brand, item.brand.as_str()),
    ];

    let mut matched = BTreeSet::new();
    for (field, raw) in fields {
        let text = normalize(raw);
        if !text.is_empty()
            && tokens
                .iter()
                .all(|token| partial_ratio(token, &text) >= threshold)
        {
            matched.insert(field);
        }
    }
    matched
}

/// Score descending, bulk price ascending (unpriced last), stock
/// descending, part number ascending
fn rank_order(a: &MatchCandidate, b: &MatchCandidate) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| cmp_bulk_price(a, b))
        .then_with(|| b.item.stock.cmp(&a.item.stock))
        .then_with(|| a.item.id.cmp(&b.item.id))
}

fn cmp_bulk_price(a: &MatchCandidate, b: &MatchCandidate) -> Ordering {
    match (a.item.best_bulk_price(), b.item.best_bulk_price()) {
        (Some(x), Some(y)) => x.cmp(y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
