// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. export::ExportError)
    clippy::module_name_repetitions
)]

//! # mdpad
//!
//! A terminal markdown editor with a live preview.
//!
//! mdpad edits markdown files in the terminal with:
//! - A side-by-side preview with syntax-highlighted code blocks
//! - Formatting shortcuts and find & replace
//! - Autosave to a shadow file
//! - Reload prompts when the file changes on disk
//! - HTML and PDF export
//!
//! ## Architecture
//!
//! mdpad uses The Elm Architecture (TEA) pattern:
//! - **Model**: Application state
//! - **Message**: Events and actions
//! - **Update**: Pure state transitions
//! - **View**: Render to terminal
//!
//! ## Modules
//!
//! - [`app`]: Main application loop and state
//! - [`editor`]: Text buffer, selection and formatting edits
//! - [`document`]: The edited file and its saved state
//! - [`render`]: Markdown to HTML and to preview lines
//! - [`ui`]: Terminal UI components
//! - [`search`]: Find and replace
//! - [`highlight`]: Syntax highlighting
//! - [`autosave`]: Periodic shadow copies
//! - [`watcher`]: File watching
//! - [`export`]: HTML and PDF export

pub mod app;
pub mod autosave;
pub mod config;
pub mod document;
pub mod editor;
pub mod error;
pub mod export;
pub mod highlight;
pub mod render;
pub mod search;
pub mod ui;
pub mod watcher;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model};
    pub use crate::document::Document;
    pub use crate::editor::{EditorBuffer, FormatAction, Selection};
    pub use crate::error::EditorError;
    pub use crate::ui::viewport::Viewport;
}
