//! Progress-callback trait for classification runs.
//!
//! Inject an [`Arc<dyn RunProgressCallback>`] via
//! [`crate::config::ClassifierConfigBuilder::progress_callback`] to drive a
//! processing indicator while the single outstanding request is in flight.
//!
//! # Example
//!
//! ```rust
//! use site_vision::{ClassifierConfig, RunProgressCallback, TestResult};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     settled: AtomicUsize,
//! }
//!
//! impl RunProgressCallback for CountingCallback {
//!     fn on_run_complete(&self, result: &TestResult) {
//!         self.settled.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("{} ({})", result.label, result.confidence_display());
//!     }
//! }
//!
//! let config = ClassifierConfig::builder()
//!     .progress_callback(Arc::new(CountingCallback { settled: AtomicUsize::new(0) }))
//!     .build()
//!     .unwrap();
//! ```

use crate::model::ModelChoice;
use crate::output::TestResult;
use std::sync::Arc;

/// Called by the classification flow around each run.
///
/// Implementations must be `Send + Sync`: the flow may run on any tokio
/// worker thread. All methods default to no-ops.
pub trait RunProgressCallback: Send + Sync {
    /// Called once the endpoint is resolved, before the file is read.
    fn on_run_start(&self, model: ModelChoice, image_name: &str) {
        let _ = (model, image_name);
    }

    /// Called when the request settles, successfully or not.
    fn on_run_complete(&self, result: &TestResult) {
        let _ = result;
    }

    /// Called when the model has no endpoint and nothing was sent.
    fn on_run_skipped(&self, model: ModelChoice) {
        let _ = model;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl RunProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ClassifierConfig`].
pub type ProgressCallback = Arc<dyn RunProgressCallback>;
