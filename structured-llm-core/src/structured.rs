//! Structured extraction
//!
//! Asks the model for JSON matching a Rust type and decodes the reply. Each
//! call is one three-turn exchange:
//!
//! 1. user: the proto3 schema of the target type
//! 2. assistant: a fixed acknowledgement, so no extra round trip is needed
//! 3. user: the JSON-only instruction followed by the caller's prompt
//!
//! The first content block of the reply must be text that decodes into the
//! target type. There are no retries and no follow-up turns.

use crate::error::{ExtractError, Result};
use crate::protocol::{ContentBlock, CreateMessage, Message, MessageResponse};
use crate::providers::{AnthropicClient, MessageExchange};
use crate::schema;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use tracing::debug;

/// Lead-in of the schema announcement turn
pub const SCHEMA_PREAMBLE: &str = "here is a protobuf schema:\n";

/// Synthetic assistant turn acknowledging the schema
pub const ACKNOWLEDGEMENT: &str = "OK";

/// Instruction that precedes the caller's prompt
pub const JSON_INSTRUCTION: &str =
    "respond only with JSON that validates against the schema above. do not include any other text.\n";

/// Per-call overrides for [`ask`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AskOptions {
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

impl AskOptions {
    pub fn new() -> Self {
        Self::default()
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

    fn into_request(self, messages: Vec<Message>) -> CreateMessage {
        CreateMessage {
            messages,
            model: self.model,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }
}

/// Text of the schema announcement turn
pub fn schema_announcement(schema: &str) -> String {
    format!("{}{}", SCHEMA_PREAMBLE, schema)
}

/// The three turns sent for an extraction
pub fn build_messages(schema: &str, prompt: &str) -> Vec<Message> {
    vec![
        Message::user(schema_announcement(schema)),
        Message::assistant(ACKNOWLEDGEMENT),
        Message::user(format!("{}{}", JSON_INSTRUCTION, prompt)),
    ]
}

/// Decode model text into `T`
///
/// On failure the error carries the text exactly as received.
pub fn decode_text<T: DeserializeOwned>(text: &str) -> Result<T> {
    serde_json::from_str(text).map_err(|_| ExtractError::input(text))
}

/// Decode the first content block of a response into `T`
pub fn extract<T: DeserializeOwned>(response: MessageResponse) -> Result<T> {
    if let Some(ContentBlock::Text { text }) = response.first_content() {
        return decode_text(text);
    }
    Err(ExtractError::Response(Box::new(response)))
}

/// Ask for a value of type `T` over any exchange
pub async fn ask<T>(exchange: &dyn MessageExchange, prompt: &str, options: AskOptions) -> Result<T>
where
    T: JsonSchema + DeserializeOwned,
{
    let schema = schema::derive::<T>()?;
    debug!(
        "Derived schema for {} ({} bytes)",
        std::any::type_name::<T>(),
        schema.len()
    );

    let request = options.into_request(build_messages(&schema, prompt));
    let response = exchange.exchange(request).await?;
    extract(response)
}

impl AnthropicClient {
    /// Ask the model for a value of type `T` using the configured defaults
    ///
    /// ```no_run
    /// use schemars::JsonSchema;
    /// use serde::Deserialize;
    /// use structured_llm_core::{AnthropicClient, ClientConfig};
    ///
    /// #[derive(Debug, Deserialize, JsonSchema)]
    /// struct Answer {
    ///     num: i64,
    /// }
    ///
    /// # async fn run() -> structured_llm_core::Result<()> {
    /// let client = AnthropicClient::new(ClientConfig::from_env()?)?;
    /// let answer: Answer = client.ask("num = 42").await?;
    /// assert_eq!(answer.num, 42);
    /// client.close();
    /// # Ok(())
    /// # }
    /// ```
    pub async fn ask<T>(&self, prompt: &str) -> Result<T>
    where
        T: JsonSchema + DeserializeOwned,
    {
        self.ask_with(prompt, AskOptions::default()).await
    }

    /// Ask the model for a value of type `T` with per-call overrides
    pub async fn ask_with<T>(&self, prompt: &str, options: AskOptions) -> Result<T>
    where
        T: JsonSchema + DeserializeOwned,
    {
        ask(self, prompt, options).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::protocol::Usage;
    use crate::schema::SchemaError;
    use async_trait::async_trait;
    use serde::Deserialize;
    use std::sync::Mutex;

    #[derive(Debug, PartialEq, Deserialize, JsonSchema)]
    struct Answer {
        num: i64,
    }

    #[allow(dead_code)]
    #[derive(Debug, Deserialize, JsonSchema)]
    struct Chain {
        next: Option<Box<Chain>>,
    }

    /// Exchange that records requests and replies with fixed content
    struct FixedExchange {
        content: Vec<ContentBlock>,
        requests: Mutex<Vec<CreateMessage>>,
    }

    impl FixedExchange {
        fn new(content: Vec<ContentBlock>) -> Self {
            Self {
                content,
                requests: Mutex::new(Vec::new()),
            }
        }

        fn text(text: &str) -> Self {
            Self::new(vec![ContentBlock::Text {
                text: text.to_string(),
            }])
        }
    }

    #[async_trait]
    impl MessageExchange for FixedExchange {
        async fn exchange(&self, request: CreateMessage) -> Result<MessageResponse> {
            self.requests.lock().unwrap().push(request);
            Ok(MessageResponse::new(
                "msg_test",
                "message",
                "assistant",
                self.content.clone(),
                "claude-3-haiku-20240307",
                "end_turn",
                None,
                Usage::default(),
            ))
        }
    }

    #[tokio::test]
    async fn test_decodes_text_reply() {
        let exchange = FixedExchange::text(r#"{"num": 42}"#);
        let answer: Answer = ask(&exchange, "num = 42", AskOptions::default())
            .await
            .unwrap();
        assert_eq!(answer, Answer { num: 42 });
    }

    #[tokio::test]
    async fn test_sends_three_turns() {
        let exchange = FixedExchange::text(r#"{"num": 1}"#);
        let _: Answer = ask(&exchange, "num = 1", AskOptions::new().with_temperature(0.0))
            .await
            .unwrap();

        let requests = exchange.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.temperature, Some(0.0));
        assert_eq!(request.model, None);
        assert_eq!(
            request.messages,
            vec![
                Message::user(
                    "here is a protobuf schema:\nsyntax = \"proto3\";\n\nmessage Answer {\n  int64 num = 1;\n}\n"
                ),
                Message::assistant("OK"),
                Message::user(
                    "respond only with JSON that validates against the schema above. do not include any other text.\nnum = 1"
                ),
            ]
        );
    }

    #[tokio::test]
    async fn test_mismatched_json_is_input_error_with_exact_text() {
        let reply = r#"{"num": "adsf"}"#;
        let exchange = FixedExchange::text(reply);
        let err = ask::<Answer>(&exchange, "num = adsf", AskOptions::default())
            .await
            .unwrap_err();

        match err {
            ExtractError::Input { value } => assert_eq!(value, reply),
            other => panic!("Expected Input error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unknown_first_block_is_response_error() {
        let exchange = FixedExchange::new(vec![
            ContentBlock::Unknown {
                id: Some("toolu_01".to_string()),
                kind: Some("tool_use".to_string()),
                name: Some("answer".to_string()),
                input: Some(serde_json::json!({"num": 42})),
                text: None,
            },
            ContentBlock::Text {
                text: r#"{"num": 42}"#.to_string(),
            },
        ]);

        match ask::<Answer>(&exchange, "num = 42", AskOptions::default()).await {
            Err(ExtractError::Response(response)) => {
                assert_eq!(response.id(), "msg_test");
                assert_eq!(response.content().len(), 2);
            }
            other => panic!("Expected Response error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_content_is_response_error() {
        let exchange = FixedExchange::new(Vec::new());
        let err = ask::<Answer>(&exchange, "num = 42", AskOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Response);
    }

    #[tokio::test]
    async fn test_schema_failure_skips_exchange() {
        let exchange = FixedExchange::text("{}");
        let err = ask::<Chain>(&exchange, "anything", AskOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ExtractError::Schema(SchemaError::Recursive(ref name)) if name == "Chain"
        ));
        assert!(exchange.requests.lock().unwrap().is_empty());
    }

    #[test]
    fn test_decode_text_round_trip() {
        let text = serde_json::to_string(&serde_json::json!({"num": -7})).unwrap();
        assert_eq!(decode_text::<Answer>(&text).unwrap(), Answer { num: -7 });
    }

    #[test]
    fn test_options_fill_request() {
        let request = AskOptions::new()
            .with_model("claude-3-opus-20240229")
            .with_max_tokens(64)
            .into_request(vec![Message::user("x")]);
        assert_eq!(request.model.as_deref(), Some("claude-3-opus-20240229"));
        assert_eq!(request.max_tokens, Some(64));
        assert_eq!(request.temperature, None);
    }
}
