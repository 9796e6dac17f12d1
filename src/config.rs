//! Configuration types for classification runs.
//!
//! All run behaviour is controlled through [`ClassifierConfig`], built via its
//! [`ClassifierConfigBuilder`] or loaded from a JSON endpoint file. Endpoint
//! URLs and API keys are always injected here; nothing in the library carries
//! a hard-coded endpoint.
//!
//! # JSON layout
//!
//! ```json
//! {
//!   "timeout_secs": 30,
//!   "endpoints": {
//!     "structural-analysis": {
//!       "url": "https://classify.example.com/crack-damage-recognition/2",
//!       "api_key": "YOUR_KEY",
//!       "payload": "form",
//!       "confidence_scale": "fraction"
//!     }
//!   }
//! }
//! ```

use crate::error::SiteVisionError;
use crate::model::ModelChoice;
use crate::progress::RunProgressCallback;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// How the base64 image is carried in the request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadFormat {
    /// Raw base64 string, `Content-Type: application/x-www-form-urlencoded`. (default)
    #[default]
    Form,
    /// `{"image": "<base64>"}`, `Content-Type: application/json`.
    Json,
}

/// Unit of the `confidence` field returned by an endpoint.
///
/// Declared per endpoint so a percentage is never scaled a second time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceScale {
    /// 0.0–1.0; multiplied by 100. (default)
    #[default]
    Fraction,
    /// Already 0–100; passed through.
    Percent,
}

/// One remote classification endpoint.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Full endpoint URL, without the `api_key` query parameter.
    pub url: String,
    /// Sent as the `api_key` query parameter.
    pub api_key: String,
    #[serde(default)]
    pub payload: PayloadFormat,
    #[serde(default)]
    pub confidence_scale: ConfidenceScale,
}

impl EndpointConfig {
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.into(),
            payload: PayloadFormat::default(),
            confidence_scale: ConfidenceScale::default(),
        }
    }

    pub fn with_payload(mut self, payload: PayloadFormat) -> Self {
        self.payload = payload;
        self
    }

    pub fn with_confidence_scale(mut self, scale: ConfidenceScale) -> Self {
        self.confidence_scale = scale;
        self
    }
}

impl fmt::Debug for EndpointConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EndpointConfig")
            .field("url", &self.url)
            .field("api_key", &redact(&self.api_key))
            .field("payload", &self.payload)
            .field("confidence_scale", &self.confidence_scale)
            .finish()
    }
}

fn redact(key: &str) -> &'static str {
    if key.is_empty() {
        "<empty>"
    } else {
        "<redacted>"
    }
}

/// Configuration for classification runs.
///
/// # Example
/// ```rust
/// use site_vision::{ClassifierConfig, EndpointConfig, ModelChoice};
///
/// let config = ClassifierConfig::builder()
///     .endpoint(
///         ModelChoice::StructuralAnalysis,
///         EndpointConfig::new("https://classify.example.com/cracks/2", "KEY"),
///     )
///     .timeout_secs(10)
///     .build()
///     .unwrap();
/// assert!(config.endpoint_for(ModelChoice::SafetyCompliance).is_none());
/// ```
#[derive(Clone)]
pub struct ClassifierConfig {
    /// Model → endpoint mapping. A model missing here is unsupported.
    pub endpoints: BTreeMap<ModelChoice, EndpointConfig>,

    /// Replaces every endpoint's `api_key` when set (e.g. from `SITE_VISION_API_KEY`).
    pub api_key_override: Option<String>,

    /// Per-request timeout in seconds. Default: 30.
    pub timeout_secs: u64,

    /// Optional progress callback invoked around each run.
    pub progress_callback: Option<Arc<dyn RunProgressCallback>>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            endpoints: BTreeMap::new(),
            api_key_override: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ClassifierConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassifierConfig")
            .field("endpoints", &self.endpoints)
            .field(
                "api_key_override",
                &self.api_key_override.as_deref().map(redact),
            )
            .field("timeout_secs", &self.timeout_secs)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn RunProgressCallback>"),
            )
            .finish()
    }
}

/// On-disk shape of the endpoint file. Keys are model tags or titles.
#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    timeout_secs: Option<u64>,
    #[serde(default)]
    endpoints: BTreeMap<String, EndpointConfig>,
}

impl ClassifierConfig {
    /// Create a new builder for `ClassifierConfig`.
    pub fn builder() -> ClassifierConfigBuilder {
        ClassifierConfigBuilder {
            config: Self::default(),
        }
    }

    /// Parse a JSON endpoint document and validate it.
    pub fn from_json_str(json: &str) -> Result<Self, SiteVisionError> {
        let file: ConfigFile = serde_json::from_str(json)?;
        let mut builder = Self::builder();
        if let Some(secs) = file.timeout_secs {
            builder = builder.timeout_secs(secs);
        }
        for (key, endpoint) in file.endpoints {
            let model: ModelChoice = key
                .parse()
                .map_err(|e| SiteVisionError::InvalidConfig(format!("{e}")))?;
            builder = builder.endpoint(model, endpoint);
        }
        builder.build()
    }

    /// Read and parse a JSON endpoint file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SiteVisionError> {
        let path = path.as_ref();
        let json =
            std::fs::read_to_string(path).map_err(|source| SiteVisionError::ConfigNotFound {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_json_str(&json)
    }

    /// Resolve the endpoint for `model`, applying the API key override.
    ///
    /// Returns `None` when the model has no mapping.
    pub fn endpoint_for(&self, model: ModelChoice) -> Option<EndpointConfig> {
        let mut endpoint = self.endpoints.get(&model)?.clone();
        if let Some(ref key) = self.api_key_override {
            endpoint.api_key = key.clone();
        }
        Some(endpoint)
    }

    pub fn is_supported(&self, model: ModelChoice) -> bool {
        self.endpoints.contains_key(&model)
    }
}

/// Builder for [`ClassifierConfig`].
pub struct ClassifierConfigBuilder {
    config: ClassifierConfig,
}

impl fmt::Debug for ClassifierConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassifierConfigBuilder")
            .field("config", &self.config)
            .finish()
    }
}

impl ClassifierConfigBuilder {
    /// Map `model` to `endpoint`, replacing any earlier mapping.
    pub fn endpoint(mut self, model: ModelChoice, endpoint: EndpointConfig) -> Self {
        self.config.endpoints.insert(model, endpoint);
        self
    }

    pub fn api_key_override(mut self, key: impl Into<String>) -> Self {
        self.config.api_key_override = Some(key.into());
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout_secs = secs;
        self
    }

    pub fn progress_callback(mut self, cb: Arc<dyn RunProgressCallback>) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ClassifierConfig, SiteVisionError> {
        let c = &self.config;
        if c.timeout_secs == 0 {
            return Err(SiteVisionError::InvalidConfig(
                "timeout_secs must be ≥ 1".into(),
            ));
        }
        for (model, endpoint) in &c.endpoints {
            let parsed = reqwest::Url::parse(&endpoint.url).map_err(|e| {
                SiteVisionError::InvalidConfig(format!(
                    "endpoint for '{model}' has an invalid URL '{}': {e}",
                    endpoint.url
                ))
            })?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(SiteVisionError::InvalidConfig(format!(
                    "endpoint for '{model}' must use http or https, got '{}'",
                    parsed.scheme()
                )));
            }
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "timeout_secs": 12,
        "endpoints": {
            "structural-analysis": {
                "url": "https://classify.example.com/crack-damage-recognition/2",
                "api_key": "k1"
            },
            "Safety Compliance": {
                "url": "https://classify.example.com/construction-class/1",
                "api_key": "k2",
                "payload": "json",
                "confidence_scale": "percent"
            }
        }
    }"#;

    #[test]
    fn parses_json_mapping() {
        let config = ClassifierConfig::from_json_str(SAMPLE).unwrap();
        assert_eq!(config.timeout_secs, 12);

        let structural = config.endpoint_for(ModelChoice::StructuralAnalysis).unwrap();
        assert_eq!(structural.payload, PayloadFormat::Form);
        assert_eq!(structural.confidence_scale, ConfidenceScale::Fraction);

        let safety = config.endpoint_for(ModelChoice::SafetyCompliance).unwrap();
        assert_eq!(safety.payload, PayloadFormat::Json);
        assert_eq!(safety.confidence_scale, ConfidenceScale::Percent);
        assert_eq!(safety.api_key, "k2");

        assert!(!config.is_supported(ModelChoice::SolarPanelAnalysis));
    }

    #[test]
    fn unknown_model_key_is_rejected() {
        let json = r#"{"endpoints": {"roofing": {"url": "https://x.test/", "api_key": ""}}}"#;
        let err = ClassifierConfig::from_json_str(json).unwrap_err();
        assert!(matches!(err, SiteVisionError::InvalidConfig(_)), "got: {err}");
    }

    #[test]
    fn api_key_override_applies_to_every_endpoint() {
        let config = ClassifierConfig::builder()
            .endpoint(
                ModelChoice::StructuralAnalysis,
                EndpointConfig::new("https://a.test/1", "old"),
            )
            .api_key_override("new")
            .build()
            .unwrap();
        let ep = config.endpoint_for(ModelChoice::StructuralAnalysis).unwrap();
        assert_eq!(ep.api_key, "new");
    }

    #[test]
    fn rejects_zero_timeout() {
        let err = ClassifierConfig::builder().timeout_secs(0).build().unwrap_err();
        assert!(err.to_string().contains("timeout_secs"));
    }

    #[test]
    fn rejects_non_http_url() {
        let err = ClassifierConfig::builder()
            .endpoint(
                ModelChoice::SafetyCompliance,
                EndpointConfig::new("ftp://files.test/model", "k"),
            )
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("http or https"), "got: {err}");
    }

    #[test]
    fn debug_redacts_keys() {
        let config = ClassifierConfig::builder()
            .endpoint(
                ModelChoice::StructuralAnalysis,
                EndpointConfig::new("https://a.test/1", "secret-key"),
            )
            .build()
            .unwrap();
        let dbg = format!("{config:?}");
        assert!(!dbg.contains("secret-key"));
        assert!(dbg.contains("<redacted>"));
    }
}
