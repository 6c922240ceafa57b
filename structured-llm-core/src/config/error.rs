//! Errors raised while building a client configuration

use thiserror::Error;

/// Why a configuration could not be produced
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// `message` comes from the YAML/JSON parser and includes the location
    #[error("cannot parse config file '{path}': {message}")]
    Parse { path: String, message: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("environment variable '{var}' is not set")]
    EnvVarNotFound { var: String },

    /// A validated value the HTTP stack still refuses (header bytes, TLS setup)
    #[error("unusable client settings: {message}")]
    Invalid { message: String },
}

/// A client setting that failed validation
#[derive(Debug, Error)]
#[error("client setting '{field}' {kind}")]
pub struct ValidationError {
    /// Dotted path of the setting, e.g. `connection.request_timeout_ms`
    pub field: String,
    pub kind: ValidationErrorKind,
}

#[derive(Debug, Error)]
pub enum ValidationErrorKind {
    #[error("must not be empty")]
    Missing,

    #[error("is out of range: {reason}")]
    OutOfRange { reason: String },

    #[error("is not a usable endpoint: {reason}")]
    InvalidUrl { reason: String },

    #[error("still contains the placeholder ${{{var}}}")]
    UnresolvedPlaceholder { var: String },
}

impl ValidationError {
    pub fn missing(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind: ValidationErrorKind::Missing,
        }
    }

    pub fn out_of_range(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind: ValidationErrorKind::OutOfRange {
                reason: reason.into(),
            },
        }
    }

    pub fn invalid_url(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind: ValidationErrorKind::InvalidUrl {
                reason: reason.into(),
            },
        }
    }

    pub fn unresolved(field: impl Into<String>, var: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind: ValidationErrorKind::UnresolvedPlaceholder { var: var.into() },
        }
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;
