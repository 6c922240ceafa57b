//! Messages API wire types
//!
//! These types match the endpoint's JSON and are only used for
//! serialization/deserialization at the HTTP boundary.

use crate::protocol::{Message, Usage};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Request body for `POST /v1/messages`
#[derive(Debug, Serialize)]
pub(crate) struct RequestBody<'a> {
    pub messages: &'a [Message],
    pub model: &'a str,
    pub max_tokens: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// One content item as sent by the endpoint
///
/// Every field is optional because the set of block shapes is open. An
/// explicit `"input": null` is kept as `Some(Value::Null)`, distinct from an
/// absent `input`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawContentBlock {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub input: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Response body of a successful messages call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnthropicResponse {
    pub id: String,

    #[serde(rename = "type")]
    pub kind: String,

    pub role: String,

    pub content: Vec<RawContentBlock>,

    pub model: String,

    pub stop_reason: String,

    #[serde(default)]
    pub stop_sequence: Option<String>,

    pub usage: Usage,
}

fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}
