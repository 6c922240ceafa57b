//! Anthropic messages client

use super::converter::{from_anthropic_response, to_request_body};
use super::types::AnthropicResponse;
use crate::config::{ClientConfig, ConfigError, ConfigValidator};
use crate::error::{ExtractError, Result};
use crate::http::HttpClient;
use crate::protocol::{CreateMessage, Message, MessageResponse};
use crate::providers::adapter::MessageExchange;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info};
use uuid::Uuid;

const API_KEY_HEADER: HeaderName = HeaderName::from_static("x-api-key");
const API_VERSION_HEADER: HeaderName = HeaderName::from_static("anthropic-version");

/// Client for the messages endpoint
///
/// Owns one pooled HTTP client for its lifetime. Calls take `&self` and may
/// run concurrently; clones share the pool. Call [`close`](Self::close) when
/// done to release it.
#[derive(Clone)]
pub struct AnthropicClient {
    config: Arc<ClientConfig>,
    http: HttpClient,
    headers: HeaderMap,
    url: String,
}

impl AnthropicClient {
    /// Create a client from a configuration
    pub fn new(config: ClientConfig) -> Result<Self> {
        ConfigValidator::new()
            .validate(&config)
            .map_err(ConfigError::from)?;

        let http = HttpClient::with_config(&config.connection)?;
        let headers = build_headers(&config)?;
        let url = config.messages_url();
        debug!(
            "Created messages client for {} with key {}",
            url,
            config.api_key.hint()
        );

        Ok(Self {
            config: Arc::new(config),
            http,
            headers,
            url,
        })
    }

    /// Create a client configured from the process environment
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send one messages request with explicit parameters
    ///
    /// A temperature outside the configured range is rejected with
    /// [`ExtractError::Input`] before anything is sent.
    pub async fn create(
        &self,
        messages: &[Message],
        model: &str,
        max_tokens: u32,
        temperature: Option<f32>,
    ) -> Result<MessageResponse> {
        self.check_temperature(temperature)?;

        let request_id = Uuid::new_v4();
        info!(
            "Sending {} message(s) to {} [request_id: {}]",
            messages.len(),
            model,
            request_id
        );

        let body = to_request_body(messages, model, max_tokens, temperature);
        let response_text = self
            .http
            .post_json(&self.url, self.headers.clone(), &body, request_id)
            .await?;

        let response: AnthropicResponse = serde_json::from_str(&response_text).map_err(|e| {
            error!("Failed to parse response [request_id: {}]: {}", request_id, e);
            ExtractError::Decode(format!(
                "Invalid response format: {} [request_id: {}]",
                e, request_id
            ))
        })?;

        let response = from_anthropic_response(response);
        debug!(
            "Response {} stopped with {} after {} token(s) [request_id: {}]",
            response.id(),
            response.stop_reason(),
            response.usage().total(),
            request_id
        );

        Ok(response)
    }

    /// Send one messages request, filling unset parameters from the config
    pub async fn create_request(&self, request: CreateMessage) -> Result<MessageResponse> {
        let model = request.model.as_deref().unwrap_or(&self.config.model);
        let max_tokens = request.max_tokens.unwrap_or(self.config.max_tokens);
        self.create(&request.messages, model, max_tokens, request.temperature)
            .await
    }

    /// Release the connection pool held by this client
    ///
    /// Other clones keep the pool alive until they are dropped too.
    pub fn close(self) {
        debug!("Closing messages client for {}", self.url);
    }

    fn check_temperature(&self, temperature: Option<f32>) -> Result<()> {
        match temperature {
            Some(t) if !self.config.temperature_range.contains(t) => {
                Err(ExtractError::input(t.to_string()))
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl MessageExchange for AnthropicClient {
    async fn exchange(&self, request: CreateMessage) -> Result<MessageResponse> {
        self.create_request(request).await
    }
}

impl fmt::Debug for AnthropicClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnthropicClient")
            .field("url", &self.url)
            .field("model", &self.config.model)
            .field("api_key", &self.config.api_key)
            .finish()
    }
}

fn build_headers(config: &ClientConfig) -> std::result::Result<HeaderMap, ConfigError> {
    let mut api_key =
        HeaderValue::from_str(config.api_key.expose_secret()).map_err(|_| ConfigError::Invalid {
            message: "api_key contains characters not allowed in a header".to_string(),
        })?;
    api_key.set_sensitive(true);

    let api_version =
        HeaderValue::from_str(&config.api_version).map_err(|_| ConfigError::Invalid {
            message: format!("api_version '{}' is not a valid header value", config.api_version),
        })?;

    let mut headers = HeaderMap::new();
    headers.insert(API_KEY_HEADER, api_key);
    headers.insert(API_VERSION_HEADER, api_version);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn client() -> AnthropicClient {
        AnthropicClient::new(ClientConfig::new("sk-ant-test").with_base_url("http://127.0.0.1:9"))
            .unwrap()
    }

    #[tokio::test]
    async fn test_out_of_range_temperature_fails_before_sending() {
        // Nothing listens on port 9; reaching the network would be a Transport error.
        let err = client()
            .create(&[Message::user("hi")], "m", 16, Some(1.1))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Input);
        match err {
            ExtractError::Input { value } => assert_eq!(value, "1.1"),
            other => panic!("Expected Input error, got {:?}", other),
        }
    }

    #[test]
    fn test_headers() {
        let headers = build_headers(&ClientConfig::new("sk-ant-test")).unwrap();
        assert_eq!(headers["x-api-key"], "sk-ant-test");
        assert!(headers["x-api-key"].is_sensitive());
        assert_eq!(headers["anthropic-version"], "2023-06-01");
        assert_eq!(headers["content-type"], "application/json");
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let err = AnthropicClient::new(ClientConfig::new("")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_debug_redacts_key() {
        let rendered = format!("{:?}", client());
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("sk-ant-test"));
    }
}
