//! Error types for the messages client and structured extraction

use crate::config::ConfigError;
use crate::protocol::MessageResponse;
use crate::schema::SchemaError;
use thiserror::Error;

/// Result type for client operations
pub type Result<T> = std::result::Result<T, ExtractError>;

/// Errors surfaced by [`AnthropicClient`](crate::providers::anthropic::AnthropicClient)
///
/// Every error is returned from the call that detected it. Nothing is
/// retried and nothing is decoded a second time.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Caller or model supplied data that is invalid. `value` carries the
    /// offending literal: the rejected temperature, or the exact text the
    /// model returned that could not be decoded.
    #[error("Invalid input: {value}")]
    Input { value: String },

    /// The endpoint answered with a non-success status
    #[error("API error {status}: {body}")]
    Api { status: String, body: String },

    /// The response arrived intact but cannot be used for extraction
    #[error("Unusable response {}: {} content block(s)", .0.id(), .0.content().len())]
    Response(Box<MessageResponse>),

    /// The target type has no schema representation
    #[error("Schema derivation failed: {0}")]
    Schema(#[from] SchemaError),

    /// Connection, timeout or body read failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// A success response whose body does not match the wire format
    #[error("Failed to decode response body: {0}")]
    Decode(String),

    /// Client construction failed
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Coarse error category, for callers that only need to pick a remediation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Input,
    Api,
    Response,
    Schema,
    Transport,
    Decode,
    Config,
}

impl ExtractError {
    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExtractError::Input { .. } => ErrorKind::Input,
            ExtractError::Api { .. } => ErrorKind::Api,
            ExtractError::Response(_) => ErrorKind::Response,
            ExtractError::Schema(_) => ErrorKind::Schema,
            ExtractError::Transport(_) => ErrorKind::Transport,
            ExtractError::Decode(_) => ErrorKind::Decode,
            ExtractError::Config(_) => ErrorKind::Config,
        }
    }

    pub(crate) fn input(value: impl Into<String>) -> Self {
        ExtractError::Input {
            value: value.into(),
        }
    }
}

impl From<reqwest::Error> for ExtractError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ExtractError::Transport(format!("Request timed out: {}", err))
        } else if err.is_connect() {
            ExtractError::Transport(format!("Connection failed: {}", err))
        } else {
            ExtractError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ExtractError {
    fn from(err: serde_json::Error) -> Self {
        ExtractError::Decode(err.to_string())
    }
}
