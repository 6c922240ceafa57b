//! Exchange abstraction
//!
//! Structured extraction only needs "send these messages, get a response".
//! Keeping that behind a trait lets the orchestration run against any
//! implementation, including in-memory fakes.

use crate::error::Result;
use crate::protocol::{CreateMessage, MessageResponse};
use async_trait::async_trait;

/// One request/response exchange with a messages endpoint
#[async_trait]
pub trait MessageExchange: Send + Sync {
    /// Send the request and return the classified response
    async fn exchange(&self, request: CreateMessage) -> Result<MessageResponse>;
}
