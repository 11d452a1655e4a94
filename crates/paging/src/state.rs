//! Page-state machine for one query session
//!
//! State is recomputed on every query or page-size change and never
//! persisted. Navigation clamps instead of failing: walking past either
//! boundary is a no-op.

use serde::{Deserialize, Serialize};

/// Pagination state for a single active query session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageState {
    current_page: u32,
    page_size: u32,
    total_items: u64,
}

impl PageState {
    /// Create state positioned on page 1. A zero `page_size` is bumped to 1.
    pub fn new(page_size: u32, total_items: u64) -> Self {
        Self {
            current_page: 1,
            page_size: page_size.max(1),
            total_items,
        }
    }

    /// Page currently displayed (1-based)
    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    /// Items per page
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Total items reported by the last query
    pub fn total_items(&self) -> u64 {
        self.total_items
    }

    /// Number of pages: `ceil(total_items / page_size)`. Zero when there
    /// are no items.
    pub fn total_pages(&self) -> u32 {
        let pages = self.total_items.div_ceil(u64::from(self.page_size));
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    /// Offset of the first item on the current page
    pub fn offset(&self) -> u64 {
        u64::from(self.current_page - 1) * u64::from(self.page_size)
    }

    /// Whether pages exist beyond the current one
    pub fn has_more(&self) -> bool {
        self.current_page < self.total_pages()
    }

    /// Jump to `page`, clamped into `[1, total_pages]`. Returns the page
    /// actually landed on.
    pub fn goto(&mut self, page: u32) -> u32 {
        let last = self.total_pages().max(1);
        self.current_page = page.clamp(1, last);
        self.current_page
    }

    /// Advance one page; no-op on the last page
    pub fn next(&mut self) -> u32 {
        self.goto(self.current_page.saturating_add(1))
    }

    /// Step back one page; no-op on the first page
    pub fn previous(&mut self) -> u32 {
        self.goto(self.current_page.saturating_sub(1))
    }

    /// Jump to the first page
    pub fn first(&mut self) -> u32 {
        self.goto(1)
    }

    /// Jump to the last page
    pub fn last(&mut self) -> u32 {
        self.goto(self.total_pages().max(1))
    }

    /// Change the page size and return to page 1
    pub fn set_page_size(&mut self, page_size: u32) {
        self.page_size = page_size.max(1);
        self.current_page = 1;
    }

    /// Update the item count after a query, keeping the current page in
    /// range
    pub fn set_total_items(&mut self, total_items: u64) {
        self.total_items = total_items;
        self.goto(self.current_page);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(PageState::new(100, 0).total_pages(), 0);
        assert_eq!(PageState::new(100, 1).total_pages(), 1);
        assert_eq!(PageState::new(100, 100).total_pages(), 1);
        assert_eq!(PageState::new(100, 101).total_pages(), 2);
        assert_eq!(PageState::new(100, 10_350).total_pages(), 104);
    }

    #[test]
    fn test_goto_clamps() {
        let mut state = PageState::new(100, 10_350);
        assert_eq!(state.goto(0), 1);
        assert_eq!(state.goto(50), 50);
        assert_eq!(state.goto(9_999), 104);
    }

    #[test]
    fn test_next_previous_boundary_no_ops() {
        let mut state = PageState::new(10, 25);

        assert_eq!(state.previous(), 1);
        assert_eq!(state.next(), 2);
        assert_eq!(state.next(), 3);
        assert_eq!(state.next(), 3);
    }

    #[test]
    fn test_first_last() {
        let mut state = PageState::new(10, 95);
        state.goto(5);
        assert_eq!(state.last(), 10);
        assert_eq!(state.first(), 1);
    }

    #[test]
    fn test_page_size_change_resets_to_first_page() {
        let mut state = PageState::new(10, 200);
        state.goto(7);
        state.set_page_size(50);
        assert_eq!(state.current_page(), 1);
        assert_eq!(state.total_pages(), 4);
    }

    #[test]
    fn test_shrinking_results_reclamps_current_page() {
        let mut state = PageState::new(10, 200);
        state.goto(20);
        state.set_total_items(35);
        assert_eq!(state.current_page(), 4);
    }

    #[test]
    fn test_empty_results_stay_on_page_one() {
        let mut state = PageState::new(10, 0);
        assert_eq!(state.goto(5), 1);
        assert!(!state.has_more());
        assert_eq!(state.offset(), 0);
    }

    #[test]
    fn test_offset() {
        let mut state = PageState::new(25, 1000);
        state.goto(3);
        assert_eq!(state.offset(), 50);
    }
}
