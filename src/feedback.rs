//! Star-rating feedback on a test result.
//!
//! The form collects a rating and a comment and hands them to a
//! caller-supplied [`FeedbackCallback`]; nothing is persisted here. Submitting
//! or cancelling consumes the form, so a form can fire `on_submit` at most
//! once.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Highest selectable star rating.
pub const MAX_RATING: u8 = 5;

/// What the user submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    /// 1–5 stars; 0 when the user never picked one (not rejected).
    pub rating: u8,
    pub comment: String,
}

/// Receives the form's outcome.
pub trait FeedbackCallback: Send + Sync {
    /// Called once on submit, before [`FeedbackCallback::on_close`].
    fn on_submit(&self, feedback: Feedback);

    /// Called after submit, and on cancel.
    fn on_close(&self) {}
}

/// The in-progress form.
pub struct FeedbackForm {
    feedback: Feedback,
    callback: Arc<dyn FeedbackCallback>,
}

impl std::fmt::Debug for FeedbackForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedbackForm")
            .field("feedback", &self.feedback)
            .finish_non_exhaustive()
    }
}

impl FeedbackForm {
    pub fn new(callback: Arc<dyn FeedbackCallback>) -> Self {
        Self {
            feedback: Feedback::default(),
            callback,
        }
    }

    /// Pick a star. Values above [`MAX_RATING`] are clamped.
    pub fn set_rating(&mut self, rating: u8) -> &mut Self {
        self.feedback.rating = rating.min(MAX_RATING);
        self
    }

    pub fn set_comment(&mut self, comment: impl Into<String>) -> &mut Self {
        self.feedback.comment = comment.into();
        self
    }

    pub fn rating(&self) -> u8 {
        self.feedback.rating
    }

    pub fn comment(&self) -> &str {
        &self.feedback.comment
    }

    /// Hand the feedback to `on_submit`, then close.
    pub fn submit(self) {
        self.callback.on_submit(self.feedback);
        self.callback.on_close();
    }

    /// Close without submitting.
    pub fn cancel(self) {
        self.callback.on_close();
    }
}
