//! HTTP plumbing shared by the hosted providers

use crate::LlmError;
use reqwest::StatusCode;
use std::time::Duration;

/// Longest response body kept in an error message
const MAX_ERROR_BODY: usize = 500;

/// Build a client with an overall request timeout
pub(crate) fn client(timeout: Duration) -> Result<reqwest::Client, LlmError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| LlmError::Config(format!("Failed to build HTTP client: {}", e)))
}

/// Map a transport-level failure
pub(crate) fn request_error(e: reqwest::Error) -> LlmError {
    if e.is_timeout() {
        LlmError::Timeout
    } else {
        LlmError::Communication(format!("Request failed: {}", e))
    }
}

/// Map a non-success status and its body
pub(crate) fn status_error(status: StatusCode, body: &str, model: &str) -> LlmError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => LlmError::RateLimitExceeded,
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => LlmError::Unauthorized(truncate(body)),
        StatusCode::NOT_FOUND => LlmError::ModelNotAvailable(model.to_string()),
        _ => LlmError::Http {
            status: status.as_u16(),
            body: truncate(body),
        },
    }
}

/// Send a prepared request and return the body of a successful response
pub(crate) async fn send(request: reqwest::RequestBuilder, model: &str) -> Result<String, LlmError> {
    let response = request.send().await.map_err(request_error)?;
    let status = response.status();
    let body = response.text().await.map_err(request_error)?;

    if status.is_success() {
        Ok(body)
    } else {
        tracing::debug!(status = status.as_u16(), model, "LLM request rejected");
        Err(status_error(status, &body, model))
    }
}

fn truncate(body: &str) -> String {
    body.chars().take(MAX_ERROR_BODY).collect()
}
