//! Environment variable handling for configuration

use super::error::ConfigError;
use super::schema::ClientConfig;
use super::validator::ConfigValidator;
use regex::Regex;
use std::env;
use std::sync::LazyLock;

/// Variable holding the API key
pub const API_KEY_VAR: &str = "ANTHROPIC_API_KEY";

/// Optional override for the endpoint host
pub const BASE_URL_VAR: &str = "ANTHROPIC_BASE_URL";

/// Optional override for the default model
pub const MODEL_VAR: &str = "ANTHROPIC_MODEL";

pub(crate) static ENV_VAR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("placeholder pattern is valid")
});

/// Interpolate `${VAR}` references in a configuration string
pub fn interpolate_env_vars(content: &str) -> Result<String, ConfigError> {
    let mut result = content.to_string();
    let mut missing_vars = Vec::new();

    for cap in ENV_VAR_PATTERN.captures_iter(content) {
        let full_match = &cap[0];
        let var_name = &cap[1];

        match env::var(var_name) {
            Ok(value) => {
                result = result.replace(full_match, &value);
            }
            Err(_) => {
                missing_vars.push(var_name.to_string());
            }
        }
    }

    if let Some(var) = missing_vars.into_iter().next() {
        return Err(ConfigError::EnvVarNotFound { var });
    }

    Ok(result)
}

/// Build a client configuration from the process environment
///
/// `ANTHROPIC_API_KEY` is required. `ANTHROPIC_BASE_URL` and
/// `ANTHROPIC_MODEL` override the defaults when set.
pub fn from_env() -> Result<ClientConfig, ConfigError> {
    let api_key = env::var(API_KEY_VAR).map_err(|_| ConfigError::EnvVarNotFound {
        var: API_KEY_VAR.to_string(),
    })?;

    let mut config = ClientConfig::new(api_key);
    if let Ok(base_url) = env::var(BASE_URL_VAR) {
        config = config.with_base_url(base_url);
    }
    if let Ok(model) = env::var(MODEL_VAR) {
        config = config.with_model(model);
    }

    ConfigValidator::new().validate(&config)?;
    Ok(config)
}

impl ClientConfig {
    /// See [`from_env`]
    pub fn from_env() -> Result<Self, ConfigError> {
        from_env()
    }
}
