//! Configuration module
//!
//! Client configuration can be built in code, read from the process
//! environment, or loaded from YAML/JSON files with `${VAR}` interpolation.
//! Every path ends in the same validation.

mod env;
mod error;
mod schema;
mod secrets;
mod validator;

pub use env::{from_env, interpolate_env_vars, API_KEY_VAR, BASE_URL_VAR, MODEL_VAR};
pub use error::{ConfigError, ConfigResult, ValidationError, ValidationErrorKind};
pub use schema::{
    ClientConfig, ConnectionConfig, TemperatureRange, DEFAULT_API_VERSION, DEFAULT_BASE_URL,
    DEFAULT_MAX_TOKENS, DEFAULT_MODEL,
};
pub use secrets::SecretString;
pub use validator::ConfigValidator;

use std::fs;
use std::path::Path;

/// Load a configuration from a YAML file
pub fn load_from_yaml<P: AsRef<Path>>(path: P) -> ConfigResult<ClientConfig> {
    let path = path.as_ref();
    let content = read(path)?;

    // Interpolate environment variables before parsing
    let interpolated = env::interpolate_env_vars(&content)?;

    let config: ClientConfig =
        serde_yaml::from_str(&interpolated).map_err(|e| ConfigError::Parse {
            path: path.to_string_lossy().to_string(),
            message: e.to_string(),
        })?;

    ConfigValidator::new().validate(&config)?;
    Ok(config)
}

/// Load a configuration from a JSON file
pub fn load_from_json<P: AsRef<Path>>(path: P) -> ConfigResult<ClientConfig> {
    let path = path.as_ref();
    let content = read(path)?;

    let interpolated = env::interpolate_env_vars(&content)?;

    let config: ClientConfig =
        serde_json::from_str(&interpolated).map_err(|e| ConfigError::Parse {
            path: path.to_string_lossy().to_string(),
            message: e.to_string(),
        })?;

    ConfigValidator::new().validate(&config)?;
    Ok(config)
}

fn read(path: &Path) -> ConfigResult<String> {
    fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_string_lossy().to_string(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_yaml() {
        let yaml = r#"
api_key: sk-ant-test
model: claude-3-5-sonnet-20240620
temperature_range:
  min: 0.0
  max: 2.0
"#;
        let config: ClientConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.model, "claude-3-5-sonnet-20240620");
        assert_eq!(config.temperature_range.max, 2.0);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let yaml = "api_key: sk-ant-test\nretries: 3\n";
        assert!(serde_yaml::from_str::<ClientConfig>(yaml).is_err());
    }
}
