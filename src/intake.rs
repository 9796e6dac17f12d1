//! Image intake: the single selected file, its preview, and the result slot.
//!
//! ## Preview lifetime
//!
//! A [`PreviewUrl`] is an owned handle. For on-disk images it simply points at
//! the original file. For in-memory images the bytes are written to a managed
//! [`tempfile`] so there is something a viewer can open; the temp file is
//! deleted when the handle is dropped. Replacing or clearing the selection
//! drops the old handle, which is how a previous preview gets released.
//!
//! Only the declared MIME type is checked. Oversized or corrupt images are
//! accepted here and fail later, at encode or request time.

use crate::error::{ClassifyError, SiteVisionError};
use crate::output::TestResult;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

const UNKNOWN_MIME: &str = "application/octet-stream";

/// Where the image bytes live.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    /// On disk; read lazily at encode time.
    Path(PathBuf),
    /// Already in memory (uploads, clipboard, tests).
    Bytes(Vec<u8>),
}

/// A user-chosen file with its declared MIME type.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageFile {
    pub name: String,
    pub mime_type: String,
    pub source: ImageSource,
}

impl ImageFile {
    /// Describe an on-disk file. The MIME type comes from the extension; the
    /// file itself is not opened.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            name,
            mime_type: mime_from_path(path),
            source: ImageSource::Path(path.to_path_buf()),
        }
    }

    pub fn from_bytes(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            source: ImageSource::Bytes(bytes.into()),
        }
    }

    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }
}

/// Guess a MIME type from the file extension using the `image` crate's table.
pub fn mime_from_path(path: &Path) -> String {
    image::ImageFormat::from_path(path)
        .map(|f| f.to_mime_type().to_string())
        .unwrap_or_else(|_| UNKNOWN_MIME.to_string())
}

/// Ephemeral display reference for the selected image.
#[derive(Debug)]
pub struct PreviewUrl {
    url: String,
    _temp: Option<NamedTempFile>,
}

impl PreviewUrl {
    fn for_file(file: &ImageFile) -> Result<Self, SiteVisionError> {
        match &file.source {
            ImageSource::Path(path) => Ok(Self {
                url: file_url(path),
                _temp: None,
            }),
            ImageSource::Bytes(bytes) => {
                let suffix = Path::new(&file.name)
                    .extension()
                    .map(|e| format!(".{}", e.to_string_lossy()))
                    .unwrap_or_default();
                let preview_err = |source: std::io::Error| SiteVisionError::PreviewFailed {
                    name: file.name.clone(),
                    source,
                };
                let mut temp = tempfile::Builder::new()
                    .prefix("site-vision-preview-")
                    .suffix(&suffix)
                    .tempfile()
                    .map_err(preview_err)?;
                temp.write_all(bytes).map_err(preview_err)?;
                temp.flush().map_err(preview_err)?;
                Ok(Self {
                    url: file_url(temp.path()),
                    _temp: Some(temp),
                })
            }
        }
    }

    pub fn as_str(&self) -> &str {
        &self.url
    }

    /// Path of the managed temp file, if this preview owns one.
    pub fn temp_path(&self) -> Option<&Path> {
        self._temp.as_ref().map(|t| t.path())
    }
}

fn file_url(path: &Path) -> String {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    reqwest::Url::from_file_path(&absolute)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| format!("file://{}", absolute.display()))
}

/// An accepted file together with its live preview.
#[derive(Debug)]
pub struct SelectedImage {
    pub file: ImageFile,
    pub preview: PreviewUrl,
}

/// Outcome of [`ImageIntake::select_file`].
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    Accepted,
    /// Not an image; intake state is untouched.
    Ignored(ClassifyError),
}

/// Holds zero or one selected image and the result for it.
#[derive(Debug, Default)]
pub struct ImageIntake {
    selected: Option<SelectedImage>,
    result: Option<TestResult>,
}

impl ImageIntake {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `file` if its declared type starts with `image/`.
    ///
    /// On acceptance the previous preview is released and any result is
    /// cleared. If the preview cannot be created the error is returned and
    /// the previous selection stays in place.
    pub fn select_file(&mut self, file: ImageFile) -> Result<Selection, SiteVisionError> {
        if !file.is_image() {
            debug!("Ignoring '{}': declared type '{}'", file.name, file.mime_type);
            return Ok(Selection::Ignored(ClassifyError::InvalidFileType {
                name: file.name,
                mime_type: file.mime_type,
            }));
        }

        let preview = PreviewUrl::for_file(&file)?;
        debug!("Selected '{}' → {}", file.name, preview.as_str());

        self.selected = Some(SelectedImage { file, preview });
        self.result = None;
        Ok(Selection::Accepted)
    }

    /// Drop the file, release the preview, clear the result.
    pub fn clear(&mut self) {
        self.selected = None;
        self.result = None;
    }

    pub fn selected(&self) -> Option<&ImageFile> {
        self.selected.as_ref().map(|s| &s.file)
    }

    pub fn preview_url(&self) -> Option<&str> {
        self.selected.as_ref().map(|s| s.preview.as_str())
    }

    pub fn preview(&self) -> Option<&PreviewUrl> {
        self.selected.as_ref().map(|s| &s.preview)
    }

    pub fn result(&self) -> Option<&TestResult> {
        self.result.as_ref()
    }

    /// Store the settled result for the current selection.
    ///
    /// Ignored when nothing is selected, since a result without an image
    /// would break the selection/result pairing.
    pub fn set_result(&mut self, result: TestResult) {
        if self.selected.is_some() {
            self.result = Some(result);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png(name: &str) -> ImageFile {
        ImageFile::from_bytes(name, "image/png", vec![0x89, b'P', b'N', b'G'])
    }

    #[test]
    fn mime_from_extension() {
        assert_eq!(mime_from_path(Path::new("wall.JPG")), "image/jpeg");
        assert_eq!(mime_from_path(Path::new("a/b/helmet.png")), "image/png");
        assert_eq!(mime_from_path(Path::new("notes.txt")), UNKNOWN_MIME);
        assert_eq!(mime_from_path(Path::new("noext")), UNKNOWN_MIME);
    }

    #[test]
    fn non_image_leaves_state_unchanged() {
        let mut intake = ImageIntake::new();
        intake.select_file(png("first.png")).unwrap();
        intake.set_result(TestResult::success("crack", 50.0));
        let url_before = intake.preview_url().map(str::to_string);

        let outcome = intake
            .select_file(ImageFile::from_bytes("doc.pdf", "application/pdf", b"%PDF".to_vec()))
            .unwrap();

        assert!(matches!(
            outcome,
            Selection::Ignored(ClassifyError::InvalidFileType { .. })
        ));
        assert_eq!(intake.selected().unwrap().name, "first.png");
        assert_eq!(intake.preview_url().map(str::to_string), url_before);
        assert!(intake.result().is_some());
    }

    #[test]
    fn non_image_on_empty_intake() {
        let mut intake = ImageIntake::new();
        let outcome = intake
            .select_file(ImageFile::from_bytes("a.txt", "text/plain", b"hi".to_vec()))
            .unwrap();
        assert_ne!(outcome, Selection::Accepted);
        assert!(intake.selected().is_none());
        assert!(intake.preview_url().is_none());
    }

    #[test]
    fn new_selection_releases_old_preview_and_result() {
        let mut intake = ImageIntake::new();
        intake.select_file(png("one.png")).unwrap();
        let old_temp = intake.preview().unwrap().temp_path().unwrap().to_path_buf();
        assert!(old_temp.exists());
        intake.set_result(TestResult::success("crack", 87.0));

        assert_eq!(intake.select_file(png("two.png")).unwrap(), Selection::Accepted);

        assert!(!old_temp.exists(), "previous preview should be released");
        assert!(intake.result().is_none());
        assert_eq!(intake.selected().unwrap().name, "two.png");
        assert!(intake.preview_url().unwrap().ends_with(".png"));
    }

    #[test]
    fn select_then_clear_yields_empty_state() {
        let mut intake = ImageIntake::new();
        intake.select_file(png("one.png")).unwrap();
        let temp = intake.preview().unwrap().temp_path().unwrap().to_path_buf();
        intake.set_result(TestResult::error("boom"));

        intake.clear();

        assert!(intake.selected().is_none());
        assert!(intake.preview_url().is_none());
        assert!(intake.result().is_none());
        assert!(!temp.exists());
    }

    #[test]
    fn path_preview_points_at_original() {
        let mut intake = ImageIntake::new();
        intake
            .select_file(ImageFile::from_path("/srv/photos/wall.jpg"))
            .unwrap();
        let url = intake.preview_url().unwrap();
        assert!(url.starts_with("file://"), "got: {url}");
        assert!(url.ends_with("/srv/photos/wall.jpg"), "got: {url}");
        assert!(intake.preview().unwrap().temp_path().is_none());
    }

    #[test]
    fn result_needs_a_selection() {
        let mut intake = ImageIntake::new();
        intake.set_result(TestResult::success("crack", 10.0));
        assert!(intake.result().is_none());
    }
}
