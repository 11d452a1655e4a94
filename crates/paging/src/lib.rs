//! Pagination engine for bommatch
//!
//! Drives page navigation over arbitrarily large catalog result sets:
//! - [`PageState`]: the per-session page-state machine
//! - [`button_window`]: stable, duplicate-free page-button windows
//! - [`ButtonStrip`]: rendered buttons with full-teardown rebuilds and
//!   dynamic label width
//!
//! Consumers render the strip and call `goto`/`next`/`previous`/`first`/
//! `last`; nothing here is persisted between queries.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

mod buttons;
mod state;
mod window;

pub use buttons::{digit_width, ButtonStrip, PageButton};
pub use state::PageState;
pub use window::{button_window, window_for};
