//! The single outbound classification request.
//!
//! Exactly one POST per run: no retry, no backoff. A failed request is a
//! terminal, reported outcome for that run.

use crate::config::{EndpointConfig, PayloadFormat};
use crate::error::ClassifyError;
use crate::pipeline::normalize::ClassificationResponse;
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::debug;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

#[derive(Serialize)]
struct JsonPayload<'a> {
    image: &'a str,
}

/// POST `image_b64` to `endpoint` and parse the JSON reply.
///
/// The API key travels as the `api_key` query parameter. Transport errors,
/// timeouts, non-2xx statuses and non-JSON bodies all map to
/// [`ClassifyError::Request`].
pub async fn send_classification(
    endpoint: &EndpointConfig,
    image_b64: String,
    timeout_secs: u64,
) -> Result<ClassificationResponse, ClassifyError> {
    let start = Instant::now();

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| ClassifyError::Request(e.to_string()))?;

    let builder = client
        .post(&endpoint.url)
        .query(&[("api_key", endpoint.api_key.as_str())]);

    let builder = match endpoint.payload {
        PayloadFormat::Form => builder
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(image_b64),
        PayloadFormat::Json => builder.json(&JsonPayload { image: &image_b64 }),
    };

    // `without_url` keeps the api_key query parameter out of error labels.
    let response = builder.send().await.map_err(|e| {
        if e.is_timeout() {
            ClassifyError::Request(format!("timed out after {timeout_secs}s"))
        } else {
            ClassifyError::Request(e.without_url().to_string())
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(ClassifyError::Request(format!("HTTP {status}")));
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| ClassifyError::Request(e.without_url().to_string()))?;

    debug!(
        "Endpoint replied {} ({} bytes) in {:?}",
        status,
        body.len(),
        start.elapsed()
    );

    ClassificationResponse::from_body(&body)
}
