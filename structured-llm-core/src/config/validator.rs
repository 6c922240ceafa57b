//! Configuration validation utilities

use super::env::ENV_VAR_PATTERN;
use super::error::ValidationError;
use super::schema::ClientConfig;
use super::secrets::KEY_PREFIX;
use tracing::warn;

/// Configuration validator with rules beyond field-level checks
#[derive(Debug, Default)]
pub struct ConfigValidator;

impl ConfigValidator {
    /// Create a new validator
    pub fn new() -> Self {
        Self
    }

    /// Validate a configuration with extended rules
    pub fn validate(&self, config: &ClientConfig) -> Result<(), ValidationError> {
        config.validate()?;

        self.validate_placeholders(config)?;
        self.check_key_shape(config);

        Ok(())
    }

    /// Reject placeholders that survived interpolation
    fn validate_placeholders(&self, config: &ClientConfig) -> Result<(), ValidationError> {
        let fields = [
            ("api_key", config.api_key.expose_secret()),
            ("base_url", config.base_url.as_str()),
            ("model", config.model.as_str()),
        ];

        for (field, value) in fields {
            if let Some(var) = self.extract_env_vars(value).into_iter().next() {
                return Err(ValidationError::unresolved(field, var));
            }
        }

        Ok(())
    }

    /// Plain-text keys of an unexpected shape are allowed but reported
    fn check_key_shape(&self, config: &ClientConfig) {
        if !config.api_key.expose_secret().starts_with(KEY_PREFIX) {
            warn!("API key does not start with '{}'", KEY_PREFIX);
        }
    }

    /// Extract environment variables from a string
    pub fn extract_env_vars(&self, text: &str) -> Vec<String> {
        ENV_VAR_PATTERN
            .captures_iter(text)
            .map(|cap| cap[1].to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ValidationErrorKind;

    #[test]
    fn test_env_var_extraction() {
        let validator = ConfigValidator::new();

        let text = "api_key: ${ANTHROPIC_API_KEY}, url: ${API_BASE_URL}";
        let vars = validator.extract_env_vars(text);

        assert_eq!(vars.len(), 2);
        assert!(vars.contains(&"ANTHROPIC_API_KEY".to_string()));
        assert!(vars.contains(&"API_BASE_URL".to_string()));
    }

    #[test]
    fn test_unresolved_placeholder_is_rejected() {
        let validator = ConfigValidator::new();
        let config = ClientConfig::new("${ANTHROPIC_API_KEY}");

        let err = validator.validate(&config).unwrap_err();
        assert_eq!(err.field, "api_key");
        assert!(matches!(
            err.kind,
            ValidationErrorKind::UnresolvedPlaceholder { ref var } if var == "ANTHROPIC_API_KEY"
        ));
    }

    #[test]
    fn test_unusual_key_shape_still_validates() {
        let validator = ConfigValidator::new();
        assert!(validator.validate(&ClientConfig::new("local-proxy-key")).is_ok());
    }
}
