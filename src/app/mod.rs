//! Application state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete application state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`App::run`]: Main event loop with rendering
//!
//! File I/O never happens in [`update`]. It queues a request on the model
//! and the effect handler performs it, reporting failures as toasts.

mod effects;
mod event_loop;
mod input;
mod model;
mod update;

pub use model::{
    FileRequest, FindField, Model, Overlay, PathPrompt, PromptKind, Setting, ToastLevel,
};
pub use update::{Message, update};

use std::path::PathBuf;

use crate::autosave::AutosaveMonitor;
use crate::config::EditorConfig;
use crate::document::Document;
use crate::export::{PdfConverter, Wkhtmltopdf};
use crate::watcher::WatchRegistry;

/// Main application struct that owns the terminal and runs the event loop.
pub struct App {
    document: Option<Document>,
    config: EditorConfig,
    config_global_path: Option<PathBuf>,
    config_local_path: Option<PathBuf>,
    watcher: WatchRegistry,
    autosave: AutosaveMonitor,
    converter: Box<dyn PdfConverter>,
}

impl App {
    /// Create a new application editing `document`.
    pub fn new(document: Document) -> Self {
        let config = EditorConfig::default();
        Self {
            document: Some(document),
            watcher: WatchRegistry::new(config.watch),
            autosave: AutosaveMonitor::new(config.autosave_interval),
            config,
            config_global_path: None,
            config_local_path: None,
            converter: Box::new(Wkhtmltopdf::default()),
        }
    }

    /// Apply startup settings: theme, background, autosave cadence, watching.
    pub fn with_config(mut self, config: EditorConfig) -> Self {
        self.watcher = WatchRegistry::new(config.watch);
        self.autosave = AutosaveMonitor::new(config.autosave_interval);
        self.config = config;
        self
    }

    /// Use a different HTML-to-PDF converter.
    pub fn with_converter(mut self, converter: Box<dyn PdfConverter>) -> Self {
        self.converter = converter;
        self
    }

    /// Set config paths to show in help.
    pub fn with_config_paths(
        mut self,
        global_path: Option<PathBuf>,
        local_path: Option<PathBuf>,
    ) -> Self {
        self.config_global_path = global_path;
        self.config_local_path = local_path;
        self
    }

    /// Build the initial model and start watching the document's file.
    pub(crate) fn initial_model(&mut self, size: (u16, u16)) -> Model {
        let document = self.document.take().unwrap_or_default();
        if let Some(path) = document.file_path() {
            self.watcher.register(path);
        }
        let mut model = Model::new(document, size).with_config(&self.config);
        model
            .config_global_path
            .clone_from(&self.config_global_path);
        model.config_local_path.clone_from(&self.config_local_path);
        model
    }

    /// Apply a message and its side effects to `model`.
    pub(crate) fn dispatch(&mut self, model: &mut Model, msg: Message) {
        *model = update(std::mem::take(model), msg);
        self.handle_side_effects(model);
    }
}

#[cfg(test)]
mod tests;
