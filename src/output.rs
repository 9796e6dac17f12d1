//! The normalized outcome of one classification run.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Label used for error results whose underlying message is empty.
pub const FALLBACK_ERROR_LABEL: &str = "Error processing image";

/// Whether the run produced a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultStatus {
    Success,
    Error,
}

impl ResultStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ResultStatus::Success => "success",
            ResultStatus::Error => "error",
        }
    }

    /// Single-glyph indicator: check mark or alert cross.
    pub fn indicator(self) -> &'static str {
        match self {
            ResultStatus::Success => "✓",
            ResultStatus::Error => "✗",
        }
    }
}

impl fmt::Display for ResultStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one settled request.
///
/// Built in one step by [`TestResult::success`] or [`TestResult::error`];
/// there is no partially-filled state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    /// Percentage in `[0, 100]`.
    pub confidence: f64,
    /// Predicted class, or the failure message for error results.
    pub label: String,
    pub status: ResultStatus,
}

impl TestResult {
    /// A successful classification. `confidence` is clamped into `[0, 100]`;
    /// NaN becomes 0.
    pub fn success(label: impl Into<String>, confidence: f64) -> Self {
        Self {
            confidence: clamp_percent(confidence),
            label: label.into(),
            status: ResultStatus::Success,
        }
    }

    /// A failed run: zero confidence, the message as label.
    pub fn error(message: impl Into<String>) -> Self {
        let message = message.into();
        let label = if message.trim().is_empty() {
            FALLBACK_ERROR_LABEL.to_string()
        } else {
            message
        };
        Self {
            confidence: 0.0,
            label,
            status: ResultStatus::Error,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ResultStatus::Success
    }

    /// Confidence with exactly two decimals and a percent sign, e.g. `87.00%`.
    pub fn confidence_display(&self) -> String {
        format!("{:.2}%", self.confidence)
    }
}

fn clamp_percent(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}
