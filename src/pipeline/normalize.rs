//! Response normalization: endpoint JSON → [`TestResult`].
//!
//! Hosted classifiers disagree on field names. The label is taken from the
//! first non-empty of `class`, `label`, `top`; confidence comes from
//! `confidence` and is interpreted according to the endpoint's declared
//! [`ConfidenceScale`], so a value is scaled at most once.

use crate::config::ConfidenceScale;
use crate::error::ClassifyError;
use crate::output::TestResult;
use serde::Deserialize;

/// Label used when the response carries no class name.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// The fields of a classification response this crate reads. Everything else
/// is ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ClassificationResponse {
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub class: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub top: Option<String>,
}

impl ClassificationResponse {
    /// Parse a response body. Anything but a JSON object is a request failure.
    pub fn from_body(body: &[u8]) -> Result<Self, ClassifyError> {
        serde_json::from_slice(body)
            .map_err(|e| ClassifyError::Request(format!("unreadable response body: {e}")))
    }

    fn best_label(&self) -> &str {
        [&self.class, &self.label, &self.top]
            .into_iter()
            .flatten()
            .map(|s| s.trim())
            .find(|s| !s.is_empty())
            .unwrap_or(UNKNOWN_LABEL)
    }
}

/// Turn a parsed response into a success result.
pub fn normalize(response: &ClassificationResponse, scale: ConfidenceScale) -> TestResult {
    let raw = response.confidence.unwrap_or(0.0);
    let percent = match scale {
        ConfidenceScale::Fraction => raw * 100.0,
        ConfidenceScale::Percent => raw,
    };
    TestResult::success(response.best_label(), percent)
}
