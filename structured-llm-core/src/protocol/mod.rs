//! Protocol module for message request/response structures
//!
//! These structures are the caller-facing vocabulary of the client:
//! - Messages are plain role + text pairs
//! - Responses carry content already classified into closed variants
//! - Everything is created per call and never mutated afterwards

pub mod types;

pub use types::{
    ContentBlock, CreateMessage, Message, MessageResponse, Usage, ROLE_ASSISTANT, ROLE_USER,
};
