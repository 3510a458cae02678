//! The open Markdown document.
//!
//! A document is the editor buffer plus the path it is bound to and the text
//! as it was last loaded or saved. Dirty state is derived by comparing the
//! two, never tracked separately.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::editor::EditorBuffer;
use crate::error::EditorError;

#[derive(Debug, Default)]
pub struct Document {
    pub buffer: EditorBuffer,
    file_path: Option<PathBuf>,
    saved_text: String,
}

impl Document {
    /// An empty, untitled document.
    pub fn untitled() -> Self {
        Self::default()
    }

    /// A document with text but no backing file yet.
    pub fn from_text(text: &str) -> Self {
        Self {
            buffer: EditorBuffer::from_text(text),
            file_path: None,
            saved_text: String::new(),
        }
    }

    /// An empty document bound to a path that does not exist yet.
    ///
    /// The first save creates the file.
    pub fn unsaved_at(path: impl Into<PathBuf>) -> Self {
        Self {
            buffer: EditorBuffer::empty(),
            file_path: Some(path.into()),
            saved_text: String::new(),
        }
    }

    /// Load a UTF-8 document from disk.
    ///
    /// # Errors
    /// Returns [`EditorError::Open`] if the file cannot be read or is not UTF-8.
    pub fn load(path: &Path) -> Result<Self, EditorError> {
        let text = read_text(path)?;
        info!(path = %path.display(), bytes = text.len(), "loaded document");
        Ok(Self {
            buffer: EditorBuffer::from_text(&text),
            file_path: Some(path.to_path_buf()),
            saved_text: text,
        })
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    pub fn text(&self) -> String {
        self.buffer.text()
    }

    /// Whether the text differs from what was last loaded or saved.
    pub fn is_dirty(&self) -> bool {
        self.buffer.text() != self.saved_text
    }

    /// File name for the title bar, or "Untitled".
    pub fn display_name(&self) -> String {
        self.file_path
            .as_deref()
            .and_then(Path::file_name)
            .map_or_else(|| "Untitled".to_string(), |n| n.to_string_lossy().to_string())
    }

    /// Write to the bound path.
    ///
    /// # Errors
    /// Returns [`EditorError::Untitled`] when no path is bound, or
    /// [`EditorError::Save`] if the write fails.
    pub fn save(&mut self) -> Result<PathBuf, EditorError> {
        let path = self.file_path.clone().ok_or(EditorError::Untitled)?;
        self.save_as(&path)?;
        Ok(path)
    }

    /// Write to `path` and bind the document to it.
    ///
    /// The binding only changes if the write succeeds.
    ///
    /// # Errors
    /// Returns [`EditorError::Save`] if the write fails.
    pub fn save_as(&mut self, path: &Path) -> Result<(), EditorError> {
        let text = self.buffer.text();
        fs::write(path, text.as_bytes()).map_err(|source| EditorError::Save {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "saved document");
        self.file_path = Some(path.to_path_buf());
        self.saved_text = text;
        Ok(())
    }

    /// Replace the buffer with the file's current contents, discarding edits.
    ///
    /// # Errors
    /// Returns [`EditorError::Untitled`] when no path is bound, or
    /// [`EditorError::Open`] if the read fails; the buffer is untouched then.
    pub fn reload(&mut self) -> Result<(), EditorError> {
        let path = self.file_path.clone().ok_or(EditorError::Untitled)?;
        let text = read_text(&path)?;
        debug!(path = %path.display(), "reloaded document from disk");
        self.buffer.set_text(&text);
        self.saved_text = text;
        Ok(())
    }
}

fn read_text(path: &Path) -> Result<String, EditorError> {
    fs::read_to_string(path).map_err(|source| EditorError::Open {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_untitled_document_is_clean_and_named_untitled() {
        let doc = Document::untitled();
        assert!(!doc.is_dirty());
        assert_eq!(doc.display_name(), "Untitled");
        assert!(doc.file_path().is_none());
    }

    #[test]
    fn test_save_then_load_roundtrips_multibyte_text() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.md");
        let text = "# Überschrift\n\n日本語 — 🦀 ok\n";

        let mut doc = Document::from_text(text);
        doc.save_as(&path).unwrap();
        let loaded = Document::load(&path).unwrap();

        assert_eq!(loaded.text(), text);
        assert_eq!(std::fs::read(&path).unwrap(), text.as_bytes());
    }

    #[test]
    fn test_dirty_is_derived_from_saved_text() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.md");
        std::fs::write(&path, "abc").unwrap();

        let mut doc = Document::load(&path).unwrap();
        assert!(!doc.is_dirty());
        doc.buffer.insert_char('x');
        assert!(doc.is_dirty());
        doc.buffer.delete_back();
        assert!(!doc.is_dirty(), "undoing the edit by hand restores clean state");
    }

    #[test]
    fn test_save_untitled_is_an_error() {
        let mut doc = Document::from_text("x");
        assert!(matches!(doc.save(), Err(EditorError::Untitled)));
    }

    #[test]
    fn test_failed_save_keeps_binding_and_text() {
        let dir = tempdir().unwrap();
        let bad = dir.path().join("missing-dir").join("a.md");
        let mut doc = Document::from_text("keep me");

        assert!(doc.save_as(&bad).is_err());
        assert!(doc.file_path().is_none());
        assert_eq!(doc.text(), "keep me");
    }

    #[test]
    fn test_load_missing_file_reports_open_error() {
        let dir = tempdir().unwrap();
        let err = Document::load(&dir.path().join("none.md")).unwrap_err();
        assert!(matches!(err, EditorError::Open { .. }));
    }

    #[test]
    fn test_reload_discards_unsaved_edits() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.md");
        std::fs::write(&path, "disk").unwrap();
        let mut doc = Document::load(&path).unwrap();
        doc.buffer.insert_str("local ");

        std::fs::write(&path, "changed on disk").unwrap();
        doc.reload().unwrap();

        assert_eq!(doc.text(), "changed on disk");
        assert!(!doc.is_dirty());
    }
}
