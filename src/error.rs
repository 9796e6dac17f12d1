//! Error types for the site-vision library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`SiteVisionError`] — **Fatal**: the caller's request cannot proceed at
//!   all (unreadable endpoint config, preview allocation failed, PDF export
//!   failed). Returned as `Err(SiteVisionError)`.
//!
//! * [`ClassifyError`] — **Per run**: one classification attempt failed.
//!   [`crate::classify::run`] folds these into an error-status
//!   [`crate::output::TestResult`] (or no result at all for
//!   [`ClassifyError::UnsupportedModel`]) so the caller always gets something
//!   renderable instead of a propagated error.

use crate::model::ModelChoice;
use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the site-vision library.
#[derive(Debug, Error)]
pub enum SiteVisionError {
    // ── Config errors ─────────────────────────────────────────────────────
    /// Endpoint config file was not found or could not be read.
    #[error("Endpoint config not readable: '{path}': {source}")]
    ConfigNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Endpoint config was read but is not valid JSON for [`crate::config::ClassifierConfig`].
    #[error("Endpoint config is malformed: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Intake errors ─────────────────────────────────────────────────────
    /// The preview for an in-memory image could not be written.
    #[error("Failed to create preview for '{name}': {source}")]
    PreviewFailed {
        name: String,
        #[source]
        source: std::io::Error,
    },

    // ── Export errors ─────────────────────────────────────────────────────
    /// Could not create or write the exported PDF.
    #[error("Failed to export result to '{path}': {detail}")]
    ExportFailed { path: PathBuf, detail: String },

    /// pdfium failed while building the document.
    #[error("Failed to render result PDF: {0}")]
    RenderFailed(String),

    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
PDFium is downloaded automatically on first export.\n\
If the download failed, set PDFIUM_LIB_PATH=/path/to/libpdfium to use an existing copy.\n"
    )]
    PdfiumBindingFailed(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A failure of a single classification run.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ClassifyError {
    /// Declared MIME type does not start with `image/`. Intake ignores these.
    #[error("'{name}' is not an image (declared type '{mime_type}')")]
    InvalidFileType { name: String, mime_type: String },

    /// The selected file could not be read for encoding.
    #[error("Error processing file '{name}': {detail}")]
    Encoding { name: String, detail: String },

    /// No endpoint is configured for the chosen model.
    #[error("No classification endpoint configured for '{0}'")]
    UnsupportedModel(ModelChoice),

    /// Transport failure, non-2xx status, or an unreadable response body.
    #[error("Classification request failed: {0}")]
    Request(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_model_display() {
        let e = ClassifyError::UnsupportedModel(ModelChoice::SolarPanelAnalysis);
        assert!(e.to_string().contains("solar-panel-analysis"), "got: {e}");
    }

    #[test]
    fn encoding_display_names_file() {
        let e = ClassifyError::Encoding {
            name: "wall.jpg".into(),
            detail: "No such file or directory".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("wall.jpg"));
        assert!(msg.contains("No such file"));
    }

    #[test]
    fn export_failed_display() {
        let e = SiteVisionError::ExportFailed {
            path: PathBuf::from("/tmp/test_result.pdf"),
            detail: "disk full".into(),
        };
        assert!(e.to_string().contains("test_result.pdf"));
        assert!(e.to_string().contains("disk full"));
    }

    #[test]
    fn render_failed_names_no_path() {
        let e = SiteVisionError::RenderFailed("PdfiumLibraryInternalError".into());
        assert!(!e.to_string().contains("test_result.pdf"), "got: {e}");
        assert!(e.to_string().contains("PdfiumLibraryInternalError"));
    }

    #[test]
    fn config_parse_from_serde() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let e: SiteVisionError = err.into();
        assert!(e.to_string().starts_with("Endpoint config is malformed"));
    }
}
