//! Page-button strip with full-teardown rebuilds
//!
//! Two invariants here fixed real rendering defects, and they are
//! independent of each other:
//!
//! 1. `rebuild` discards every previously built button before building the
//!    new set. Incremental updates left stale buttons behind and produced
//!    duplicate, overlapping strips.
//! 2. Labels are sized to the digit count of `total_pages`. A fixed label
//!    width truncated large page numbers, which made distinct buttons look
//!    identical even though the underlying indices were correct.

use crate::state::PageState;
use crate::window::window_for;
use serde::{Deserialize, Serialize};

/// One rendered navigation button
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageButton {
    /// Page this button navigates to
    pub page: u32,
    /// Rendered label, right-aligned to the strip's label width
    pub label: String,
    /// Whether this is the page currently shown
    pub current: bool,
}

/// The set of page buttons for one query session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ButtonStrip {
    max_buttons: u32,
    label_width: usize,
    buttons: Vec<PageButton>,
}

impl ButtonStrip {
    /// Create an empty strip showing at most `max_buttons` buttons
    pub fn new(max_buttons: u32) -> Self {
        Self {
            max_buttons,
            label_width: 0,
            buttons: Vec::new(),
        }
    }

    /// Rebuild the strip for the given state.
    ///
    /// Tears down all existing buttons unconditionally before building the
    /// new set; the strip never carries state across rebuilds.
    pub fn rebuild(&mut self, state: &PageState) {
        self.buttons.clear();

        let total_pages = state.total_pages();
        self.label_width = digit_width(total_pages);

        for page in window_for(state, self.max_buttons) {
            self.buttons.push(PageButton {
                page,
                label: format!("{:>width$}", page, width = self.label_width),
                current: page == state.current_page(),
            });
        }
    }

    /// Buttons in render order
    pub fn buttons(&self) -> &[PageButton] {
        &self.buttons
    }

    /// Label width used on the last rebuild
    pub fn label_width(&self) -> usize {
        self.label_width
    }

    /// Maximum number of buttons shown
    pub fn max_buttons(&self) -> u32 {
        self.max_buttons
    }
}

/// Number of digits needed to render every page number up to `total_pages`
pub fn digit_width(total_pages: u32) -> usize {
    let mut width = 1;
    let mut remaining = total_pages / 10;
    while remaining > 0 {
        width += 1;
        remaining /= 10;
    }
    width
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digit_width() {
        assert_eq!(digit_width(0), 1);
        assert_eq!(digit_width(9), 1);
        assert_eq!(digit_width(10), 2);
        assert_eq!(digit_width(104), 3);
        assert_eq!(digit_width(1041), 4);
    }

    #[test]
    fn test_labels_render_full_page_number() {
        let mut state = PageState::new(10, 10_410);
        state.last();

        let mut strip = ButtonStrip::new(5);
        strip.rebuild(&state);

        let last = strip.buttons().last().unwrap();
        assert_eq!(last.page, 1041);
        // The full number appears; nothing is truncated to a fixed width
        assert_eq!(last.label, "1041");
    }

    #[test]
    fn test_labels_right_aligned_to_total_width() {
        let state = PageState::new(10, 10_410);

        let mut strip = ButtonStrip::new(5);
        strip.rebuild(&state);

        assert_eq!(strip.label_width(), 4);
        assert_eq!(strip.buttons()[0].label, "   1");
        assert_eq!(strip.buttons()[4].label, "   5");
    }

    #[test]
    fn test_labels_distinct_at_scale() {
        let mut state = PageState::new(1, 99_999);
        state.goto(54_320);

        let mut strip = ButtonStrip::new(5);
        strip.rebuild(&state);

        let labels: Vec<&str> = strip.buttons().iter().map(|b| b.label.as_str()).collect();
        let mut deduped = labels.clone();
        deduped.dedup();
        assert_eq!(labels, deduped);
    }

    #[test]
    fn test_rebuild_discards_previous_buttons() {
        let mut state = PageState::new(100, 10_400);
        let mut strip = ButtonStrip::new(5);

        strip.rebuild(&state);
        assert_eq!(strip.buttons().len(), 5);

        // Shrink to a three-page result set; a partial update would leave
        // five buttons behind
        state.set_total_items(250);
        strip.rebuild(&state);

        assert_eq!(strip.buttons().len(), 3);
        let pages: Vec<u32> = strip.buttons().iter().map(|b| b.page).collect();
        assert_eq!(pages, vec![1, 2, 3]);
    }

    #[test]
    fn test_repeated_rebuilds_never_accumulate() {
        let mut state = PageState::new(10, 1_000);
        let mut strip = ButtonStrip::new(5);

        for page in [1, 50, 100, 3, 99] {
            state.goto(page);
            strip.rebuild(&state);
            assert_eq!(strip.buttons().len(), 5);

            let pages: Vec<u32> = strip.buttons().iter().map(|b| b.page).collect();
            let mut sorted = pages.clone();
            sorted.sort_unstable();
            sorted.dedup();
            assert_eq!(pages.len(), sorted.len(), "duplicate buttons after rebuild");
        }
    }

    #[test]
    fn test_exactly_one_current_button() {
        let mut state = PageState::new(10, 1_000);
        state.goto(42);

        let mut strip = ButtonStrip::new(5);
        strip.rebuild(&state);

        let current: Vec<&PageButton> =
            strip.buttons().iter().filter(|b| b.current).collect();
        assert_eq!(current.len(), 1);
        assert_eq!(current[0].page, 42);
    }

    #[test]
    fn test_empty_result_set_builds_no_buttons() {
        let state = PageState::new(10, 0);
        let mut strip = ButtonStrip::new(5);
        strip.rebuild(&state);
        assert!(strip.buttons().is_empty());
    }
}
