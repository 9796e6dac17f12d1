//! PDF export of a [`TestResult`].
//!
//! The document is a single A4 page with a title line followed by the label,
//! the confidence (two decimals) and the status. [`ResultReport`] holds those
//! lines so the formatting can be checked without a PDF engine.
//!
//! Writing goes through pdfium, which is blocking FFI, so the document is
//! built inside `spawn_blocking`. The library itself is located (and fetched
//! once, on first export) by `pdfium-auto`.

use crate::error::SiteVisionError;
use crate::output::TestResult;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File name used when the caller gives a directory or nothing at all.
pub const DEFAULT_EXPORT_FILENAME: &str = "test_result.pdf";

const TITLE: &str = "Test Result";
const MARGIN_LEFT: f32 = 56.0;
const TITLE_Y: f32 = 780.0;
const TITLE_SIZE: f32 = 20.0;
const LINE_SIZE: f32 = 12.0;
const LINE_GAP: f32 = 24.0;

/// The fixed text content of an exported result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultReport {
    pub title: String,
    pub label: String,
    pub confidence: String,
    pub status: String,
}

impl From<&TestResult> for ResultReport {
    fn from(result: &TestResult) -> Self {
        Self {
            title: TITLE.to_string(),
            label: format!("Label: {}", result.label),
            confidence: format!("Confidence: {}", result.confidence_display()),
            status: format!("Status: {}", result.status),
        }
    }
}

impl ResultReport {
    /// Body lines below the title, top to bottom.
    pub fn body_lines(&self) -> [&str; 3] {
        [&self.label, &self.confidence, &self.status]
    }
}

/// Resolve where the PDF goes: a directory gets [`DEFAULT_EXPORT_FILENAME`]
/// appended, `None` means the current directory.
///
/// A target ending in a path separator names a directory even if it does not
/// exist yet.
pub fn export_path(target: Option<&Path>) -> PathBuf {
    match target {
        None => PathBuf::from(DEFAULT_EXPORT_FILENAME),
        Some(p) if p.is_dir() || ends_with_separator(p) => p.join(DEFAULT_EXPORT_FILENAME),
        Some(p) => p.to_path_buf(),
    }
}

fn ends_with_separator(path: &Path) -> bool {
    path.as_os_str()
        .to_string_lossy()
        .chars()
        .last()
        .is_some_and(std::path::is_separator)
}

/// Render `result` to PDF bytes.
pub async fn export_to_pdf_bytes(result: &TestResult) -> Result<Vec<u8>, SiteVisionError> {
    let report = ResultReport::from(result);
    tokio::task::spawn_blocking(move || render_report_blocking(&report))
        .await
        .map_err(|e| SiteVisionError::Internal(format!("Export task panicked: {e}")))?
}

/// Render `result` and save it to `path`, creating missing parent
/// directories.
///
/// Written to a sibling temp file first and renamed into place. A failed
/// export leaves neither a truncated PDF nor the temp file behind.
pub async fn export_to_pdf(
    result: &TestResult,
    path: impl AsRef<Path>,
) -> Result<PathBuf, SiteVisionError> {
    let path = path.as_ref().to_path_buf();
    let bytes = export_to_pdf_bytes(result).await?;

    let write_err = |e: std::io::Error| SiteVisionError::ExportFailed {
        path: path.clone(),
        detail: e.to_string(),
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
    }

    let tmp_path = path.with_extension("pdf.tmp");
    if let Err(e) = tokio::fs::write(&tmp_path, &bytes).await {
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(write_err(e));
    }
    if let Err(e) = tokio::fs::rename(&tmp_path, &path).await {
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(write_err(e));
    }

    info!("Exported result to {} ({} bytes)", path.display(), bytes.len());
    Ok(path)
}

fn render_report_blocking(report: &ResultReport) -> Result<Vec<u8>, SiteVisionError> {
    let pdfium = pdfium_auto::bind_pdfium_silent()
        .map_err(|e| SiteVisionError::PdfiumBindingFailed(e.to_string()))?;

    let pdf_err = |e: PdfiumError| SiteVisionError::RenderFailed(format!("{e:?}"));

    let mut document = pdfium.create_new_pdf().map_err(pdf_err)?;
    let font = document.fonts_mut().helvetica();

    {
        let mut page = document
            .pages_mut()
            .create_page_at_end(PdfPagePaperSize::a4())
            .map_err(pdf_err)?;
        let objects = page.objects_mut();

        objects
            .create_text_object(
                PdfPoints::new(MARGIN_LEFT),
                PdfPoints::new(TITLE_Y),
                &report.title,
                font,
                PdfPoints::new(TITLE_SIZE),
            )
            .map_err(pdf_err)?;

        let mut y = TITLE_Y - LINE_GAP * 1.5;
        for line in report.body_lines() {
            objects
                .create_text_object(
                    PdfPoints::new(MARGIN_LEFT),
                    PdfPoints::new(y),
                    line,
                    font,
                    PdfPoints::new(LINE_SIZE),
                )
                .map_err(pdf_err)?;
            y -= LINE_GAP;
        }
    }

    let bytes = document.save_to_bytes().map_err(pdf_err)?;
    debug!("Rendered result PDF → {} bytes", bytes.len());
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_lines_for_success() {
        let report = ResultReport::from(&TestResult::success("crack", 87.0));
        assert_eq!(report.title, "Test Result");
        assert_eq!(
            report.body_lines(),
            ["Label: crack", "Confidence: 87.00%", "Status: success"]
        );
    }

    #[test]
    fn report_lines_for_error() {
        let report = ResultReport::from(&TestResult::error("Classification request failed: HTTP 500"));
        assert_eq!(report.confidence, "Confidence: 0.00%");
        assert_eq!(report.status, "Status: error");
        assert!(report.label.ends_with("HTTP 500"));
    }

    #[test]
    fn export_path_defaults() {
        assert_eq!(export_path(None), PathBuf::from(DEFAULT_EXPORT_FILENAME));

        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            export_path(Some(dir.path())),
            dir.path().join(DEFAULT_EXPORT_FILENAME)
        );

        let explicit = dir.path().join("wall-report.pdf");
        assert_eq!(export_path(Some(&explicit)), explicit);
    }

    #[test]
    fn trailing_separator_names_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = format!("{}/reports/", dir.path().display());
        assert_eq!(
            export_path(Some(Path::new(&missing))),
            dir.path().join("reports").join(DEFAULT_EXPORT_FILENAME)
        );

        let no_slash = dir.path().join("reports");
        assert_eq!(export_path(Some(&no_slash)), no_slash);
    }
}
