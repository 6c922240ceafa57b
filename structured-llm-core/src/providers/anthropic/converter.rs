//! Conversion between wire types and canonical protocol types

use super::types::{AnthropicResponse, RawContentBlock, RequestBody};
use crate::protocol::{ContentBlock, Message, MessageResponse};

/// Block type that marks plain text
const TEXT_TYPE: &str = "text";

/// Classify a raw content item
///
/// A block is `Text` only when its type is `"text"` and it carries text.
/// Everything else becomes `Unknown` with all fields moved over unchanged.
pub fn normalize_content(raw: RawContentBlock) -> ContentBlock {
    match raw {
        RawContentBlock {
            kind: Some(ref kind),
            text: Some(text),
            ..
        } if kind == TEXT_TYPE => ContentBlock::Text { text },
        RawContentBlock {
            id,
            kind,
            name,
            input,
            text,
        } => ContentBlock::Unknown {
            id,
            kind,
            name,
            input,
            text,
        },
    }
}

/// Build the request body for a call
pub(crate) fn to_request_body<'a>(
    messages: &'a [Message],
    model: &'a str,
    max_tokens: u32,
    temperature: Option<f32>,
) -> RequestBody<'a> {
    RequestBody {
        messages,
        model,
        max_tokens,
        temperature,
    }
}

/// Convert a wire response, classifying each content item
pub fn from_anthropic_response(response: AnthropicResponse) -> MessageResponse {
    let content = response
        .content
        .into_iter()
        .map(normalize_content)
        .collect();

    MessageResponse::new(
        response.id,
        response.kind,
        response.role,
        content,
        response.model,
        response.stop_reason,
        response.stop_sequence,
        response.usage,
    )
}
