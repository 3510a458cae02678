//! Export of the rendered document to HTML and PDF.
//!
//! PDF rendering is delegated to an external HTML-to-PDF converter behind the
//! [`PdfConverter`] trait; the default one pipes the page to `wkhtmltopdf`.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Could not write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}: {stderr}")]
    Converter {
        program: String,
        status: ExitStatus,
        stderr: String,
    },
}

/// Renders an HTML page into a PDF file.
pub trait PdfConverter {
    /// # Errors
    /// Returns an error if the converter cannot be run or reports failure.
    fn convert(&self, html: &str, output: &Path) -> Result<(), ExportError>;
}

/// Converts with the `wkhtmltopdf` command line tool.
#[derive(Debug, Clone)]
pub struct Wkhtmltopdf {
    program: String,
}

impl Wkhtmltopdf {
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for Wkhtmltopdf {
    fn default() -> Self {
        Self::with_program("wkhtmltopdf")
    }
}

impl PdfConverter for Wkhtmltopdf {
    fn convert(&self, html: &str, output: &Path) -> Result<(), ExportError> {
        let spawn_error = |source| ExportError::Spawn {
            program: self.program.clone(),
            source,
        };
        let mut child = Command::new(&self.program)
            .args(["--quiet", "--encoding", "utf-8", "-"])
            .arg(output)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(spawn_error)?;
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(html.as_bytes()).map_err(spawn_error)?;
        }
        let result = child.wait_with_output().map_err(spawn_error)?;
        if result.status.success() {
            Ok(())
        } else {
            Err(ExportError::Converter {
                program: self.program.clone(),
                status: result.status,
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            })
        }
    }
}

/// Write an already rendered HTML fragment to `path`.
///
/// # Errors
/// Returns [`ExportError::Write`] if the file cannot be written.
pub fn export_html(html: &str, path: &Path) -> Result<(), ExportError> {
    fs::write(path, html.as_bytes()).map_err(|source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "exported html");
    Ok(())
}

/// Wrap a rendered HTML fragment in a page and hand it to `converter`.
///
/// # Errors
/// Propagates the converter's error.
pub fn export_pdf(
    html: &str,
    path: &Path,
    converter: &dyn PdfConverter,
) -> Result<(), ExportError> {
    let page = html_page(html);
    converter.convert(&page, path)?;
    info!(path = %path.display(), "exported pdf");
    Ok(())
}

/// Wrap a fragment in a minimal UTF-8 document.
fn html_page(body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n</head>\n<body>\n{body}</body>\n</html>\n"
    )
}
