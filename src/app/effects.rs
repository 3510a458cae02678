use std::path::Path;
use std::time::Instant;

use tracing::{debug, warn};

use crate::app::model::FileRequest;
use crate::app::{App, Message, Model, ToastLevel};
use crate::autosave::AutosaveOutcome;
use crate::document::Document;
use crate::error::EditorError;
use crate::export::{export_html, export_pdf};

impl App {
    /// Carry out the file request queued by the last update, if any.
    pub(super) fn handle_side_effects(&mut self, model: &mut Model) {
        let Some(request) = model.take_request() else {
            return;
        };
        debug!(?request, "file request");
        match request {
            FileRequest::New => {
                self.watcher.unregister();
                model.replace_document(Document::untitled());
            }
            FileRequest::Open(path) => match Document::load(&path) {
                Ok(document) => {
                    model.replace_document(document);
                    self.watcher.register(&path);
                    model.show_toast(ToastLevel::Info, format!("Opened {}", display_name(&path)));
                }
                Err(err) => report_error(model, &err),
            },
            FileRequest::Save => match model.document.save() {
                Ok(path) => self.after_save(model, &path),
                Err(err) => report_error(model, &err),
            },
            FileRequest::SaveAs(path) => match model.document.save_as(&path) {
                Ok(()) => self.after_save(model, &path),
                Err(err) => report_error(model, &err),
            },
            FileRequest::ExportHtml(path) => {
                match export_html(&model.html, &path) {
                    Ok(()) => model.show_toast(
                        ToastLevel::Info,
                        format!("Exported HTML to {}", path.display()),
                    ),
                    Err(err) => report_error(model, &EditorError::from(err)),
                }
            }
            FileRequest::ExportPdf(path) => {
                match export_pdf(&model.html, &path, self.converter.as_ref()) {
                    Ok(()) => model.show_toast(
                        ToastLevel::Info,
                        format!("Exported PDF to {}", path.display()),
                    ),
                    Err(err) => report_error(model, &EditorError::from(err)),
                }
            }
            FileRequest::Reload => match model.document.reload() {
                Ok(()) => {
                    model.invalidate_render();
                    model.refresh_render();
                    model.show_toast(ToastLevel::Info, "Reloaded from disk");
                }
                Err(err) => report_error(model, &err),
            },
        }
    }

    /// Re-point the watcher at the saved path.
    ///
    /// The new watch starts after the write, so the save itself never comes
    /// back as an external change.
    fn after_save(&mut self, model: &mut Model, path: &Path) {
        self.watcher.register(path);
        model.show_toast(ToastLevel::Info, format!("Saved {}", display_name(path)));
    }

    /// Turn a debounced change of the watched file into a message.
    pub(super) fn poll_watcher(&mut self) -> Option<Message> {
        self.watcher.poll().map(Message::FileChanged)
    }

    /// Run an autosave tick if one is due. Returns true if the model changed.
    pub(super) fn poll_autosave(&mut self, model: &mut Model, now: Instant) -> bool {
        if !self.autosave.is_due(now) {
            return false;
        }
        let text = model.document.text();
        match self.autosave.poll(now, &text, model.file_path()) {
            Some(AutosaveOutcome::Failed(err)) => {
                report_error(model, &err);
                true
            }
            Some(AutosaveOutcome::Written(path)) => {
                debug!(path = %path.display(), "autosave tick wrote shadow copy");
                false
            }
            Some(AutosaveOutcome::Unchanged | AutosaveOutcome::Untitled) | None => false,
        }
    }
}

fn report_error(model: &mut Model, err: &EditorError) {
    warn!(error = %err, "{}", err.title());
    model.show_toast(ToastLevel::Error, format!("{}: {err}", err.title()));
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().to_string())
}
