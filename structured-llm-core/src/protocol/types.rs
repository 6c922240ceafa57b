//! Canonical message types
//!
//! These are the values callers build and receive. Wire shapes live next to
//! the provider that speaks them; by the time a response reaches this module
//! its content has already been classified into [`ContentBlock`] variants.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Role token for caller turns
pub const ROLE_USER: &str = "user";

/// Role token for model turns
pub const ROLE_ASSISTANT: &str = "assistant";

/// A single conversation turn
///
/// The role is an open string set. Values other than `"user"` and
/// `"assistant"` are passed through and left for the endpoint to judge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Message {
    /// Text content of the turn
    pub content: String,

    /// Role of the sender
    pub role: String,
}

impl Message {
    /// Create a message with an explicit role
    pub fn new(content: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            role: role.into(),
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(content, ROLE_USER)
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(content, ROLE_ASSISTANT)
    }
}

impl From<&str> for Message {
    fn from(content: &str) -> Self {
        Message::user(content)
    }
}

impl From<String> for Message {
    fn from(content: String) -> Self {
        Message::user(content)
    }
}

/// Parameters of a single messages call
///
/// Unset fields fall back to the client's configured defaults.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CreateMessage {
    pub messages: Vec<Message>,
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

impl CreateMessage {
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            ..Default::default()
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// Token accounting reported by the endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl Usage {
    /// Sum of both counts, saturating at `u64::MAX`
    pub fn total(&self) -> u64 {
        self.input_tokens.saturating_add(self.output_tokens)
    }
}

/// One classified item of a response's content list
#[derive(Debug, Clone, PartialEq)]
pub enum ContentBlock {
    /// Plain text
    Text { text: String },

    /// Any shape not recognized as plain text (tool use, images, future
    /// block types). Every field the endpoint sent is kept as received.
    Unknown {
        id: Option<String>,
        kind: Option<String>,
        name: Option<String>,
        input: Option<Value>,
        text: Option<String>,
    },
}

impl ContentBlock {
    /// Text of a `Text` block
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentBlock::Text { text } => Some(text),
            ContentBlock::Unknown { .. } => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, ContentBlock::Text { .. })
    }
}

/// Response to a single messages exchange
///
/// Built once from the wire response and never modified afterwards, so the
/// fields are only reachable through accessors.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageResponse {
    id: String,
    kind: String,
    role: String,
    content: Vec<ContentBlock>,
    model: String,
    stop_reason: String,
    stop_sequence: Option<String>,
    usage: Usage,
}

impl MessageResponse {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: impl Into<String>,
        kind: impl Into<String>,
        role: impl Into<String>,
        content: Vec<ContentBlock>,
        model: impl Into<String>,
        stop_reason: impl Into<String>,
        stop_sequence: Option<String>,
        usage: Usage,
    ) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            role: role.into(),
            content,
            model: model.into(),
            stop_reason: stop_reason.into(),
            stop_sequence,
            usage,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Object type reported by the endpoint (`"message"`)
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn content(&self) -> &[ContentBlock] {
        &self.content
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn stop_reason(&self) -> &str {
        &self.stop_reason
    }

    pub fn stop_sequence(&self) -> Option<&str> {
        self.stop_sequence.as_deref()
    }

    pub fn usage(&self) -> Usage {
        self.usage
    }

    /// First content block, if the endpoint returned any
    pub fn first_content(&self) -> Option<&ContentBlock> {
        self.content.first()
    }

    /// All text blocks joined in order, or `None` when there are none
    pub fn text(&self) -> Option<String> {
        let texts: Vec<&str> = self.content.iter().filter_map(ContentBlock::as_text).collect();
        if texts.is_empty() {
            None
        } else {
            Some(texts.concat())
        }
    }
}
