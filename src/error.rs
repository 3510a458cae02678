//! Error types for document I/O and export.
//!
//! Every variant is caught at the boundary of the operation that produced it
//! and shown to the user; none of them terminate the editor.

use std::path::PathBuf;

use thiserror::Error;

use crate::export::ExportError;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("Could not open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not save {}: {source}", path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Autosave to {} failed: {source}", path.display())]
    Autosave {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Document has no file path")]
    Untitled,

    #[error(transparent)]
    Export(#[from] ExportError),
}

impl EditorError {
    /// Short title used in the toast bar, mirroring the dialog titles.
    pub const fn title(&self) -> &'static str {
        match self {
            Self::Open { .. } => "Open Error",
            Self::Save { .. } | Self::Untitled => "Save Error",
            Self::Autosave { .. } => "Autosave Error",
            Self::Export(_) => "Export Error",
        }
    }
}
