//! Text buffer and formatting helpers for the editing pane.
//!
//! Provides a rope-backed text buffer with cursor and selection management,
//! plus pure Markdown formatting transforms over `(text, selection)`.

mod buffer;
pub mod format;
mod selection;

pub use buffer::{Cursor, Direction, EditorBuffer};
pub use format::{Edit, FormatAction};
pub use selection::Selection;
