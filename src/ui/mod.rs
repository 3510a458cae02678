//! Terminal UI components.
//!
//! This module contains all UI-related code including:
//! - [`viewport`]: Scroll position of the preview pane
//! - [`style`]: Themes and colors
//!
//! The screen is the editor pane on the left, the live preview on the right
//! and a one-line status bar that doubles as the toast area.

pub mod style;
pub mod viewport;

mod overlays;
mod render;
mod status;

pub use render::{line_number_width, pane_content_sizes, render, split_screen};

pub const PREVIEW_LEFT_PADDING: u16 = 1;
pub const EDITOR_WIDTH_PERCENT: u16 = 50;
pub const PREVIEW_WIDTH_PERCENT: u16 = 50;
