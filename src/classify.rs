//! Top-level classification API.
//!
//! [`classify`] returns typed errors; [`run`] is the UI-facing wrapper that
//! always yields something renderable (or nothing at all when the model has
//! no endpoint). Both issue at most one HTTP request.
//!
//! ## Overlapping runs
//!
//! Nothing here guards against two runs for the same selection being in
//! flight at once. If a caller starts a second run before the first settles
//! and stores both results, the last one to settle wins. Use
//! [`crate::session::TestSession`], whose `run_test` takes `&mut self`, to
//! rule that out.

use crate::config::{ClassifierConfig, EndpointConfig};
use crate::error::{ClassifyError, SiteVisionError};
use crate::intake::ImageFile;
use crate::model::ModelChoice;
use crate::output::TestResult;
use crate::pipeline::{encode, endpoint, normalize, request};
use std::path::Path;
use tracing::{info, warn};

/// Classify `image` with the endpoint mapped to `model`.
///
/// Order of operations: endpoint lookup (no I/O), file read + base64, one
/// POST, normalization. An unmapped model fails before the file is touched.
pub async fn classify(
    image: &ImageFile,
    model: ModelChoice,
    config: &ClassifierConfig,
) -> Result<TestResult, ClassifyError> {
    let endpoint = endpoint::resolve_endpoint(model, config)?;
    send(image, &endpoint, config.timeout_secs).await
}

/// Encode, POST and normalize against an already resolved endpoint.
async fn send(
    image: &ImageFile,
    endpoint: &EndpointConfig,
    timeout_secs: u64,
) -> Result<TestResult, ClassifyError> {
    let b64 = encode::encode_image(image).await?;
    let response = request::send_classification(endpoint, b64, timeout_secs).await?;
    Ok(normalize::normalize(&response, endpoint.confidence_scale))
}

/// Run one test and fold failures into the result.
///
/// * Unmapped model → `None`; no request is started.
/// * Unreadable file or failed request → `Some` error result with zero
///   confidence and the failure message as label.
/// * Otherwise → `Some` success result.
pub async fn run(
    image: &ImageFile,
    model: ModelChoice,
    config: &ClassifierConfig,
) -> Option<TestResult> {
    let cb = config.progress_callback.as_ref();

    let endpoint = match endpoint::resolve_endpoint(model, config) {
        Ok(endpoint) => endpoint,
        Err(e) => {
            warn!("{e}; nothing sent");
            if let Some(cb) = cb {
                cb.on_run_skipped(model);
            }
            return None;
        }
    };

    if let Some(cb) = cb {
        cb.on_run_start(model, &image.name);
    }

    let result = match send(image, &endpoint, config.timeout_secs).await {
        Ok(result) => {
            info!(
                "'{}' classified as '{}' ({})",
                image.name,
                result.label,
                result.confidence_display()
            );
            result
        }
        Err(e) => {
            warn!("Run for '{}' failed: {}", image.name, e);
            TestResult::error(e.to_string())
        }
    };

    if let Some(cb) = cb {
        cb.on_run_complete(&result);
    }
    Some(result)
}

/// Convenience for callers holding a path: infer the MIME type, then [`run`].
///
/// Non-image paths are ignored the same way intake ignores them.
pub async fn classify_path(
    path: impl AsRef<Path>,
    model: ModelChoice,
    config: &ClassifierConfig,
) -> Option<TestResult> {
    let file = ImageFile::from_path(path);
    if !file.is_image() {
        warn!("'{}' is not an image ({}); nothing sent", file.name, file.mime_type);
        return None;
    }
    run(&file, model, config).await
}

/// Synchronous wrapper around [`run`].
///
/// Creates a temporary tokio runtime internally.
pub fn run_sync(
    image: &ImageFile,
    model: ModelChoice,
    config: &ClassifierConfig,
) -> Result<Option<TestResult>, SiteVisionError> {
    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| SiteVisionError::Internal(format!("Failed to create tokio runtime: {e}")))?;
    Ok(runtime.block_on(run(image, model, config)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::RunProgressCallback;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Default)]
    struct Counts {
        started: AtomicUsize,
        skipped: AtomicUsize,
        completed: AtomicUsize,
    }

    impl RunProgressCallback for Counts {
        fn on_run_start(&self, _model: ModelChoice, _name: &str) {
            self.started.fetch_add(1, Ordering::SeqCst);
        }
        fn on_run_complete(&self, _result: &TestResult) {
            self.completed.fetch_add(1, Ordering::SeqCst);
        }
        fn on_run_skipped(&self, _model: ModelChoice) {
            self.skipped.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn unmapped_model_yields_nothing() {
        let counts = Arc::new(Counts::default());
        let config = ClassifierConfig::builder()
            .progress_callback(counts.clone())
            .build()
            .unwrap();
        let file = ImageFile::from_path("/definitely/not/here.png");

        assert!(run(&file, ModelChoice::SolarPanelAnalysis, &config).await.is_none());
        assert_eq!(counts.skipped.load(Ordering::SeqCst), 1);
        assert_eq!(counts.started.load(Ordering::SeqCst), 0);
        assert_eq!(counts.completed.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unreadable_file_is_error_result() {
        let counts = Arc::new(Counts::default());
        let config = ClassifierConfig::builder()
            .endpoint(
                ModelChoice::StructuralAnalysis,
                EndpointConfig::new("http://127.0.0.1:9/classify", "k"),
            )
            .progress_callback(counts.clone())
            .build()
            .unwrap();
        let file = ImageFile::from_path("/definitely/not/here/wall.jpg");

        let result = run(&file, ModelChoice::StructuralAnalysis, &config)
            .await
            .expect("mapped model always yields a result");
        assert!(!result.is_success());
        assert_eq!(result.confidence, 0.0);
        assert!(result.label.contains("wall.jpg"), "got: {}", result.label);
        assert_eq!(counts.completed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn classify_path_ignores_non_images() {
        let config = ClassifierConfig::builder()
            .endpoint(
                ModelChoice::StructuralAnalysis,
                EndpointConfig::new("http://127.0.0.1:9/classify", "k"),
            )
            .build()
            .unwrap();
        assert!(classify_path("report.docx", ModelChoice::StructuralAnalysis, &config)
            .await
            .is_none());
    }

    #[test]
    fn run_sync_without_endpoint() {
        let config = ClassifierConfig::default();
        let file = ImageFile::from_bytes("a.png", "image/png", vec![0u8]);
        let out = run_sync(&file, ModelChoice::SafetyCompliance, &config).unwrap();
        assert!(out.is_none());
    }
}
