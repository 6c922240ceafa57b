//! structured-llm core library
//!
//! A client for the Anthropic Messages API with schema-driven structured
//! extraction: describe a Rust type with `schemars::JsonSchema`, ask the model
//! for it, and get back a decoded value or a categorized error.

pub mod config;
pub mod error;
pub mod http;
pub mod protocol;
pub mod providers;
pub mod schema;
pub mod structured;

pub use config::{ClientConfig, ConfigError, TemperatureRange};
pub use error::{ErrorKind, ExtractError, Result};
pub use protocol::{ContentBlock, CreateMessage, Message, MessageResponse, Usage};
pub use providers::{AnthropicClient, MessageExchange};
pub use schema::SchemaError;
pub use structured::AskOptions;

/// Returns the version of the core library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
