//! HTTP client implementation using reqwest

use crate::config::{ConfigError, ConnectionConfig};
use crate::error::{ExtractError, Result};
use crate::http::error::{extract_error_details, map_http_error};
use reqwest::header::HeaderMap;
use reqwest::{Client, ClientBuilder, Response};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

/// Maximum response size (10MB)
const MAX_RESPONSE_SIZE: usize = 10 * 1024 * 1024;

/// Default user agent
const USER_AGENT: &str = concat!("structured-llm/", env!("CARGO_PKG_VERSION"));

/// Shared HTTP client with connection pooling
///
/// Clones share one pool. The pool is released when the last clone is
/// dropped.
#[derive(Clone)]
pub struct HttpClient {
    /// The underlying reqwest client
    client: Arc<Client>,

    /// Maximum response size to prevent OOM
    max_response_size: usize,
}

impl HttpClient {
    /// Create a new HTTP client from connection settings
    pub fn with_config(connection: &ConnectionConfig) -> Result<Self> {
        let client = ClientBuilder::new()
            .pool_max_idle_per_host(connection.max_idle_per_host)
            .pool_idle_timeout(Duration::from_secs(connection.keepalive_secs))
            .connect_timeout(Duration::from_millis(connection.connect_timeout_ms))
            .timeout(Duration::from_millis(connection.request_timeout_ms))
            .user_agent(USER_AGENT)
            .gzip(true)
            .build()
            .map_err(|e| ConfigError::Invalid {
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            client: Arc::new(client),
            max_response_size: MAX_RESPONSE_SIZE,
        })
    }

    /// POST a JSON body and return the success response text
    ///
    /// A non-success status is read to the end and returned as
    /// [`ExtractError::Api`].
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        url: &str,
        headers: HeaderMap,
        body: &B,
        request_id: Uuid,
    ) -> Result<String> {
        let response = self
            .client
            .post(url)
            .headers(headers)
            .header("X-Request-ID", request_id.to_string())
            .json(body)
            .send()
            .await
            .map_err(|e| {
                warn!("Request to {} failed [request_id: {}]: {}", url, request_id, e);
                ExtractError::from(e)
            })?;

        let status = response.status();
        debug!("Response status: {} [request_id: {}]", status, request_id);

        if !status.is_success() {
            let body = response.text().await.map_err(|e| {
                ExtractError::Transport(format!(
                    "Failed to read error body for status {}: {} [request_id: {}]",
                    status, e, request_id
                ))
            })?;

            match extract_error_details(&body) {
                Some(details) => warn!(
                    "Request failed with status {} ({}): {} [request_id: {}]",
                    status,
                    details.error_type.as_deref().unwrap_or("unknown"),
                    details.message,
                    request_id
                ),
                None => warn!(
                    "Request failed with status {} [request_id: {}]",
                    status, request_id
                ),
            }

            return Err(map_http_error(status, body));
        }

        self.check_content_length(&response)?;

        let response_text = response.text().await.map_err(|e| {
            ExtractError::Transport(format!(
                "Failed to read response body: {} [request_id: {}]",
                e, request_id
            ))
        })?;

        if response_text.len() > self.max_response_size {
            return Err(self.too_large(response_text.len()));
        }

        Ok(response_text)
    }

    /// Check response size to prevent OOM
    fn check_content_length(&self, response: &Response) -> Result<()> {
        match response.content_length() {
            Some(length) if length as usize > self.max_response_size => {
                Err(self.too_large(length as usize))
            }
            _ => Ok(()),
        }
    }

    fn too_large(&self, size: usize) -> ExtractError {
        ExtractError::Decode(format!(
            "Response size {} exceeds maximum {}",
            size, self.max_response_size
        ))
    }
}
