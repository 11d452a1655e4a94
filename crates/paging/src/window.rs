//! Button-window computation
//!
//! Produces the contiguous run of page numbers shown as navigation
//! buttons. The window is centered on the current page and re-anchored at
//! the ends of the range so it always holds `min(max_buttons, total_pages)`
//! entries. An earlier implementation got the end-of-range extension wrong
//! and emitted duplicate page numbers; the regression cases live in the
//! tests below.

use crate::state::PageState;

/// Compute the page numbers to render as buttons.
///
/// For every `current_page` in `[1, total_pages]` the result is strictly
/// increasing, duplicate-free, within `[1, total_pages]`, and exactly
/// `min(max_buttons, total_pages)` long. Empty when there are no pages.
pub fn button_window(current_page: u32, total_pages: u32, max_buttons: u32) -> Vec<u32> {
    if total_pages == 0 || max_buttons == 0 {
        return Vec::new();
    }

    let current = current_page.clamp(1, total_pages);
    let half = max_buttons / 2;

    let mut start = current.saturating_sub(half).max(1);
    let mut end = current.saturating_add(half).min(total_pages);

    // Re-anchor when the window got clipped by a boundary
    if end - start + 1 < max_buttons {
        if start == 1 {
            end = start.saturating_add(max_buttons - 1).min(total_pages);
        } else if end == total_pages {
            start = end.saturating_sub(max_buttons - 1).max(1);
        }
    }

    (start..=end).collect()
}

/// Window for a [`PageState`] session
pub fn window_for(state: &PageState, max_buttons: u32) -> Vec<u32> {
    button_window(state.current_page(), state.total_pages(), max_buttons)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_page_of_large_set() {
        assert_eq!(button_window(1, 1041, 5), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_middle_of_large_set() {
        assert_eq!(button_window(521, 1041, 5), vec![519, 520, 521, 522, 523]);
    }

    #[test]
    fn test_last_page_regression() {
        // The historical duplicate-button case: end of range must extend
        // leftward, not wrap
        assert_eq!(button_window(104, 104, 5), vec![100, 101, 102, 103, 104]);
    }

    #[test]
    fn test_near_end() {
        assert_eq!(button_window(103, 104, 5), vec![100, 101, 102, 103, 104]);
        assert_eq!(button_window(102, 104, 5), vec![100, 101, 102, 103, 104]);
    }

    #[test]
    fn test_near_start() {
        assert_eq!(button_window(2, 104, 5), vec![1, 2, 3, 4, 5]);
        assert_eq!(button_window(3, 104, 5), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_fewer_pages_than_buttons() {
        assert_eq!(button_window(1, 3, 5), vec![1, 2, 3]);
        assert_eq!(button_window(2, 3, 5), vec![1, 2, 3]);
        assert_eq!(button_window(3, 3, 5), vec![1, 2, 3]);
    }

    #[test]
    fn test_single_page() {
        assert_eq!(button_window(1, 1, 5), vec![1]);
    }

    #[test]
    fn test_no_pages_no_buttons() {
        assert!(button_window(1, 0, 5).is_empty());
    }

    #[test]
    fn test_window_follows_state() {
        let mut state = crate::state::PageState::new(100, 10_350);
        state.last();
        assert_eq!(window_for(&state, 5), vec![100, 101, 102, 103, 104]);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn window_invariant_holds(
                total_pages in 1u32..5000,
                current in 1u32..5000,
                max_buttons in prop::sample::select(vec![1u32, 3, 5, 7, 9]),
            ) {
                let current = current.min(total_pages);
                let window = button_window(current, total_pages, max_buttons);

                // Exact length
                prop_assert_eq!(
                    window.len() as u32,
                    max_buttons.min(total_pages)
                );

                // Strictly increasing, so duplicate-free
                for pair in window.windows(2) {
                    prop_assert!(pair[0] < pair[1]);
                }

                // Every value in range, current page always present
                prop_assert!(window.iter().all(|&p| (1..=total_pages).contains(&p)));
                prop_assert!(window.contains(&current));
            }
        }
    }
}
