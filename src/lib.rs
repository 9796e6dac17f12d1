//! # site-vision
//!
//! Test site-inspection photos against hosted image classifiers.
//!
//! A user picks one image, chooses a capability (crack detection, helmet
//! compliance, …), and the crate sends the image to the endpoint configured
//! for that capability, then normalizes the reply into a [`TestResult`] that
//! can be rendered, exported to PDF, and rated.
//!
//! ## Run Overview
//!
//! ```text
//! image file
//!  │
//!  ├─ 1. Intake    accept `image/*` only, keep one selection + preview
//!  ├─ 2. Endpoint  model → configured URL + API key (unmapped ⇒ stop)
//!  ├─ 3. Encode    file bytes → base64
//!  ├─ 4. Request   one POST, form or JSON body, no retry
//!  ├─ 5. Normalize confidence → percent, class → label
//!  └─ 6. Output    TestResult → render / PDF export / feedback
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use site_vision::{run, ClassifierConfig, ImageFile, ModelChoice};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClassifierConfig::from_json_file("endpoints.json")?;
//!     let image = ImageFile::from_path("wall.jpg");
//!     if let Some(result) = run(&image, ModelChoice::StructuralAnalysis, &config).await {
//!         println!("{} {} ({})", result.status.indicator(), result.label, result.confidence_display());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `site-vision` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod classify;
pub mod config;
pub mod error;
pub mod export;
pub mod feedback;
pub mod intake;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod session;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use classify::{classify, classify_path, run, run_sync};
pub use config::{
    ClassifierConfig, ClassifierConfigBuilder, ConfidenceScale, EndpointConfig, PayloadFormat,
};
pub use error::{ClassifyError, SiteVisionError};
pub use export::{export_to_pdf, export_to_pdf_bytes, ResultReport, DEFAULT_EXPORT_FILENAME};
pub use feedback::{Feedback, FeedbackCallback, FeedbackForm};
pub use intake::{ImageFile, ImageIntake, ImageSource, PreviewUrl, Selection};
pub use model::ModelChoice;
pub use output::{ResultStatus, TestResult};
pub use progress::{NoopProgressCallback, ProgressCallback, RunProgressCallback};
pub use session::TestSession;
