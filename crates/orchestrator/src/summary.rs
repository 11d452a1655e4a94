//! Per-run reporting
//!
//! Every batch completion reports counts by confidence band. Nothing is
//! dropped silently: matched, unmatched, and errored items all land in
//! exactly one bucket.

use bommatch_model::{Confidence, MatchResult};
use serde::{Deserialize, Serialize};

/// Confidence-band counters for one batch run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Matches with score ≥ 90
    pub matched_high: usize,
    /// Matches with score 70–89
    pub matched_medium: usize,
    /// Matches below 70 (only possible with a lowered threshold)
    pub matched_low: usize,
    /// Items where nothing cleared the threshold
    pub unmatched: usize,
    /// Items that failed validation or exhausted retries
    pub errored: usize,
}

impl BatchSummary {
    /// Empty summary
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for one result
    pub fn record(&mut self, result: &MatchResult) {
        if result.error.is_some() {
            self.errored += 1;
            return;
        }
        match result.confidence() {
            Some(Confidence::High) => self.matched_high += 1,
            Some(Confidence::Medium) => self.matched_medium += 1,
            Some(Confidence::Low) => self.matched_low += 1,
            None => self.unmatched += 1,
        }
    }

    /// Total items accounted for
    pub fn total(&self) -> usize {
        self.matched_high + self.matched_medium + self.matched_low + self.unmatched + self.errored
    }
}

/// Everything a batch run produces
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchOutcome {
    /// One result per processed BOM item, in input order
    pub results: Vec<MatchResult>,
    /// Counts by confidence band
    pub summary: BatchSummary,
    /// Set when the run was cancelled before every item completed
    pub truncated: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use bommatch_model::BomItem;

    #[test]
    fn test_errored_wins_over_band() {
        let mut summary = BatchSummary::new();
        summary.record(&MatchResult::errored(
            BomItem::new(0, "part", 1),
            "timeout",
        ));

        assert_eq!(summary.errored, 1);
        assert_eq!(summary.total(), 1);
    }

    #[test]
    fn test_unmatched_counted() {
        let mut summary = BatchSummary::new();
        summary.record(&MatchResult::unmatched(BomItem::new(0, "part", 1)));

        assert_eq!(summary.unmatched, 1);
        assert_eq!(summary.matched_high, 0);
    }
}
