//! Model → endpoint resolution.

use crate::config::{ClassifierConfig, EndpointConfig};
use crate::error::ClassifyError;
use crate::model::ModelChoice;
use tracing::debug;

/// Look up the endpoint configured for `model`.
///
/// This is the one canonical mapping; callers never pick URLs themselves.
pub fn resolve_endpoint(
    model: ModelChoice,
    config: &ClassifierConfig,
) -> Result<EndpointConfig, ClassifyError> {
    let endpoint = config
        .endpoint_for(model)
        .ok_or(ClassifyError::UnsupportedModel(model))?;
    debug!("Model '{}' → {}", model, endpoint.url);
    Ok(endpoint)
}
