//! Client configuration structures with serde support

use super::error::ValidationError;
use super::secrets::SecretString;
use serde::Deserialize;

/// Default endpoint host
pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";

/// Value sent in the `anthropic-version` header
pub const DEFAULT_API_VERSION: &str = "2023-06-01";

/// Model used when a call does not name one
pub const DEFAULT_MODEL: &str = "claude-3-haiku-20240307";

/// Token limit used when a call does not set one
pub const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Configuration for a messages client
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    /// API key sent in the `x-api-key` header
    pub api_key: SecretString,

    /// Scheme and host of the endpoint; `/v1/messages` is appended
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Value of the `anthropic-version` header
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Default model
    #[serde(default = "default_model")]
    pub model: String,

    /// Default output token limit
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Accepted sampling temperatures
    #[serde(default)]
    pub temperature_range: TemperatureRange,

    /// Connection pool and timeout settings
    #[serde(default)]
    pub connection: ConnectionConfig,
}

/// Inclusive range of temperatures accepted before a request is sent
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TemperatureRange {
    pub min: f32,
    pub max: f32,
}

impl Default for TemperatureRange {
    fn default() -> Self {
        Self { min: 0.0, max: 1.0 }
    }
}

impl TemperatureRange {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Whether `temperature` lies inside the range. NaN never does.
    pub fn contains(&self, temperature: f32) -> bool {
        temperature >= self.min && temperature <= self.max
    }
}

/// Connection configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConnectionConfig {
    /// Connection timeout in milliseconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_ms: u64,

    /// Request timeout in milliseconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,

    /// Maximum idle connections per host
    #[serde(default = "default_max_idle")]
    pub max_idle_per_host: usize,

    /// Idle connection keep-alive in seconds
    #[serde(default = "default_keepalive")]
    pub keepalive_secs: u64,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: default_connect_timeout(),
            request_timeout_ms: default_request_timeout(),
            max_idle_per_host: default_max_idle(),
            keepalive_secs: default_keepalive(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

fn default_connect_timeout() -> u64 {
    10_000
}

fn default_request_timeout() -> u64 {
    60_000
}

fn default_max_idle() -> usize {
    10
}

fn default_keepalive() -> u64 {
    90
}

impl ClientConfig {
    /// Configuration with defaults for everything but the key
    pub fn new(api_key: impl Into<SecretString>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: default_base_url(),
            api_version: default_api_version(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature_range: TemperatureRange::default(),
            connection: ConnectionConfig::default(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature_range(mut self, range: TemperatureRange) -> Self {
        self.temperature_range = range;
        self
    }

    pub fn with_connection(mut self, connection: ConnectionConfig) -> Self {
        self.connection = connection;
        self
    }

    /// Full URL of the messages endpoint
    pub fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.base_url.trim_end_matches('/'))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.api_key.is_empty() {
            return Err(ValidationError::missing("api_key"));
        }

        if self.base_url.is_empty() {
            return Err(ValidationError::missing("base_url"));
        }

        match url::Url::parse(&self.base_url) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    return Err(ValidationError::invalid_url(
                        "base_url",
                        format!("URL scheme must be http or https, got: {}", url.scheme()),
                    ));
                }
            }
            Err(e) => {
                return Err(ValidationError::invalid_url("base_url", e.to_string()));
            }
        }

        if self.api_version.is_empty() {
            return Err(ValidationError::missing("api_version"));
        }

        if self.model.is_empty() {
            return Err(ValidationError::missing("model"));
        }

        if self.max_tokens == 0 {
            return Err(ValidationError::out_of_range(
                "max_tokens",
                "max_tokens must be greater than 0",
            ));
        }

        self.temperature_range.validate("temperature_range")?;
        self.connection.validate("connection")?;

        Ok(())
    }
}

impl TemperatureRange {
    /// Validate the range
    pub fn validate(&self, path: &str) -> Result<(), ValidationError> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(ValidationError::out_of_range(
                path,
                "temperature bounds must be finite",
            ));
        }

        if self.min > self.max {
            return Err(ValidationError::out_of_range(
                path,
                format!("min {} is greater than max {}", self.min, self.max),
            ));
        }

        Ok(())
    }
}

impl ConnectionConfig {
    /// Validate connection settings
    pub fn validate(&self, path: &str) -> Result<(), ValidationError> {
        if self.connect_timeout_ms == 0 {
            return Err(ValidationError::out_of_range(
                format!("{}.connect_timeout_ms", path),
                "connect timeout must be greater than 0",
            ));
        }

        if self.request_timeout_ms == 0 {
            return Err(ValidationError::out_of_range(
                format!("{}.request_timeout_ms", path),
                "request timeout must be greater than 0",
            ));
        }

        Ok(())
    }
}
