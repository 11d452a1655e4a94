//! Match candidates, results, and confidence bands

use crate::bom::BomItem;
use crate::catalog::CatalogItem;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Which searchable field of a candidate satisfied the query
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchedField {
    Model,
    Description,
    Brand,
}

/// One scored candidate for a BOM item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchCandidate {
    /// The catalog part
    pub item: CatalogItem,
    /// Similarity score, 0–100
    pub score: f64,
    /// Fields that individually satisfy the full query
    pub matched_fields: BTreeSet<MatchedField>,
}

/// How a match was established
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMethod {
    /// Perfect similarity
    Exact,
    /// Cleared the threshold fuzzily
    Fuzzy,
    /// Picked by a human
    Manual,
    /// Nothing cleared the threshold
    Unmatched,
}

impl fmt::Display for MatchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MatchMethod::Exact => "exact",
            MatchMethod::Fuzzy => "fuzzy",
            MatchMethod::Manual => "manual",
            MatchMethod::Unmatched => "unmatched",
        };
        f.write_str(s)
    }
}

/// Confidence band derived from a similarity score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    /// Score ≥ 90
    High,
    /// Score 70–89
    Medium,
    /// Score below 70
    Low,
}

impl Confidence {
    /// Band for a 0–100 similarity score
    pub fn of(score: f64) -> Self {
        if score >= 90.0 {
            Confidence::High
        } else if score >= 70.0 {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }
}

/// Outcome of matching one BOM item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    /// The BOM row this result belongs to
    pub bom_item: BomItem,
    /// Winning candidate, when one cleared the threshold
    pub best_candidate: Option<MatchCandidate>,
    /// Score of the winning candidate, 0 when unmatched
    pub score: f64,
    /// Remaining candidates, best first
    pub alternatives: Vec<MatchCandidate>,
    /// How the match was established
    pub method: MatchMethod,
    /// When the match was made
    pub matched_at: Option<DateTime<Utc>>,
    /// Error annotation when the item could not be processed cleanly
    pub error: Option<String>,
}

impl MatchResult {
    /// A successful match with ranked alternatives
    pub fn matched(
        bom_item: BomItem,
        best_candidate: MatchCandidate,
        alternatives: Vec<MatchCandidate>,
        method: MatchMethod,
    ) -> Self {
        let score = best_candidate.score;
        Self {
            bom_item,
            best_candidate: Some(best_candidate),
            score,
            alternatives,
            method,
            matched_at: Some(Utc::now()),
            error: None,
        }
    }

    /// No candidate cleared the threshold
    pub fn unmatched(bom_item: BomItem) -> Self {
        Self {
            bom_item,
            best_candidate: None,
            score: 0.0,
            alternatives: Vec::new(),
            method: MatchMethod::Unmatched,
            matched_at: None,
            error: None,
        }
    }

    /// The item could not be processed; carries the reason
    pub fn errored(bom_item: BomItem, message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::unmatched(bom_item)
        }
    }

    /// Whether a candidate was selected
    pub fn is_matched(&self) -> bool {
        self.best_candidate.is_some()
    }

    /// Confidence band of the match, `None` when unmatched
    pub fn confidence(&self) -> Option<Confidence> {
        self.best_candidate.as_ref().map(|c| Confidence::of(c.score))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_bands() {
        assert_eq!(Confidence::of(100.0), Confidence::High);
        assert_eq!(Confidence::of(90.0), Confidence::High);
        assert_eq!(Confidence::of(89.9), Confidence::Medium);
        assert_eq!(Confidence::of(70.0), Confidence::Medium);
        assert_eq!(Confidence::of(69.9), Confidence::Low);
        assert_eq!(Confidence::of(0.0), Confidence::Low);
    }

    #[test]
    fn test_unmatched_result() {
        let result = MatchResult::unmatched(BomItem::new(0, "mystery part", 1));
        assert!(!result.is_matched());
        assert!(result.alternatives.is_empty());
        assert_eq!(result.method, MatchMethod::Unmatched);
        assert!(result.confidence().is_none());
    }

    #[test]
    fn test_errored_result_keeps_annotation() {
        let result = MatchResult::errored(BomItem::new(2, "flaky part", 1), "provider timeout");
        assert!(!result.is_matched());
        assert_eq!(result.error.as_deref(), Some("provider timeout"));
    }

    #[test]
    fn test_method_display() {
        assert_eq!(MatchMethod::Exact.to_string(), "exact");
        assert_eq!(MatchMethod::Unmatched.to_string(), "unmatched");
    }
}
