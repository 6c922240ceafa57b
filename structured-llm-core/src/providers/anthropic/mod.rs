//! Anthropic provider implementation
//!
//! This module speaks the Messages API: it builds the wire request, performs
//! the exchange and classifies the returned content into canonical types.

mod client;
pub mod converter;
pub mod types;

pub use client::AnthropicClient;
pub use converter::normalize_content;
pub use types::{AnthropicResponse, RawContentBlock};
