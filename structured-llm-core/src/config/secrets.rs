//! API key wrapper
//!
//! The key is wrapped as soon as it is read, so formatting a config (and any
//! tracing line built from one) shows a placeholder instead of the key.

use serde::Deserialize;
use std::fmt;

const MASK: &str = "[REDACTED]";

/// Prefix of keys issued for the messages API
pub(crate) const KEY_PREFIX: &str = "sk-ant-";

/// Credential whose `Debug` and `Display` never reveal the value
#[derive(Clone, Deserialize)]
#[serde(transparent)]
pub struct SecretString(String);

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw key, for building the `x-api-key` header
    pub fn expose_secret(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Short form that identifies a key in logs: the `sk-ant-` prefix and
    /// the last four characters. Anything else is masked completely.
    pub fn hint(&self) -> String {
        let key = self.0.as_str();
        match key.strip_prefix(KEY_PREFIX) {
            Some(rest) if rest.len() > 8 && rest.is_ascii() => {
                format!("{}...{}", KEY_PREFIX, &rest[rest.len() - 4..])
            }
            _ => MASK.to_string(),
        }
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(MASK)
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(MASK)
    }
}

impl From<String> for SecretString {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for SecretString {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}
