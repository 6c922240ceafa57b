//! Provider layer
//!
//! The exchange abstraction and the concrete provider that implements it.

pub mod adapter;
pub mod anthropic;

pub use adapter::MessageExchange;
pub use anthropic::AnthropicClient;
