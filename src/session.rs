//! A single user's test session: one intake, one config.
//!
//! The session owns the only SelectedImage/TestResult pair. Because
//! [`TestSession::run_test`] borrows the session mutably until the request
//! settles, a session can never have two runs in flight, and the result it
//! stores always belongs to the image that was selected when the run began.

use crate::classify;
use crate::config::ClassifierConfig;
use crate::error::SiteVisionError;
use crate::export;
use crate::feedback::{FeedbackCallback, FeedbackForm};
use crate::intake::{ImageFile, ImageIntake, Selection};
use crate::model::ModelChoice;
use crate::output::TestResult;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug)]
pub struct TestSession {
    config: ClassifierConfig,
    intake: ImageIntake,
}

impl TestSession {
    pub fn new(config: ClassifierConfig) -> Self {
        Self {
            config,
            intake: ImageIntake::new(),
        }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    pub fn intake(&self) -> &ImageIntake {
        &self.intake
    }

    /// See [`ImageIntake::select_file`].
    pub fn select_file(&mut self, file: ImageFile) -> Result<Selection, SiteVisionError> {
        self.intake.select_file(file)
    }

    /// See [`ImageIntake::clear`].
    pub fn clear(&mut self) {
        self.intake.clear();
    }

    pub fn result(&self) -> Option<&TestResult> {
        self.intake.result()
    }

    /// Run the selected image against `model` and store the outcome.
    ///
    /// No-op returning `None` when nothing is selected or the model has no
    /// endpoint; in the latter case an earlier result is kept.
    pub async fn run_test(&mut self, model: ModelChoice) -> Option<&TestResult> {
        let file = self.intake.selected()?;
        let result = classify::run(file, model, &self.config).await?;
        self.intake.set_result(result);
        self.intake.result()
    }

    /// Export the current result as a PDF. `Ok(None)` when there is no result.
    pub async fn export_result(
        &self,
        target: Option<&Path>,
    ) -> Result<Option<PathBuf>, SiteVisionError> {
        let Some(result) = self.intake.result() else {
            return Ok(None);
        };
        let path = export::export_path(target);
        export::export_to_pdf(result, path).await.map(Some)
    }

    /// Open a feedback form; only offered once a result exists.
    pub fn feedback_form(&self, callback: Arc<dyn FeedbackCallback>) -> Option<FeedbackForm> {
        self.intake.result()?;
        Some(FeedbackForm::new(callback))
    }
}
