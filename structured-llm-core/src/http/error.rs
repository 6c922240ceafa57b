//! HTTP error mapping utilities

use crate::error::ExtractError;
use reqwest::StatusCode;
use serde_json::Value;

/// Map a non-success status and its body to an API error
///
/// The body is kept verbatim; the endpoint's own error message is only
/// pulled out for logging.
pub fn map_http_error(status: StatusCode, body: String) -> ExtractError {
    ExtractError::Api {
        status: status.to_string(),
        body,
    }
}

/// Error details extracted from a response body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDetails {
    pub error_type: Option<String>,
    pub message: String,
}

/// Extract error details from a JSON error body
///
/// Understands `{"type":"error","error":{"type":"...","message":"..."}}`
/// and the looser `{"message":"..."}` / `{"error":"..."}` shapes proxies
/// tend to return.
pub fn extract_error_details(body: &str) -> Option<ErrorDetails> {
    let json: Value = serde_json::from_str(body).ok()?;

    if let Some(error) = json.get("error") {
        if let Some(message) = error.get("message").and_then(|v| v.as_str()) {
            return Some(ErrorDetails {
                error_type: error
                    .get("type")
                    .and_then(|v| v.as_str())
                    .map(str::to_string),
                message: message.to_string(),
            });
        }

        if let Some(message) = error.as_str() {
            return Some(ErrorDetails {
                error_type: None,
                message: message.to_string(),
            });
        }
    }

    json.get("message")
        .and_then(|v| v.as_str())
        .map(|message| ErrorDetails {
            error_type: None,
            message: message.to_string(),
        })
}
