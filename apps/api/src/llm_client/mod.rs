//! Anthropic Messages API client. Listing extraction and qualification
//! screening both call through here; nothing else talks to the API.
//!
//! Every request is a single attempt. A failed call is reported to the caller
//! as-is; screening surfaces it as an upstream failure instead of retrying.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod prompts;

const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";
/// Used when `LLM_MODEL` is not set.
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-5";
const MAX_TOKENS: u32 = 4096;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("request to the Anthropic API failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Anthropic API returned {status}: {message}")]
    Api { status: StatusCode, message: String },

    #[error("response had no text content")]
    NoText,

    #[error("response text did not contain a JSON object")]
    NoJson,

    #[error("response JSON has an unexpected shape: {0}")]
    Shape(#[from] serde_json::Error),
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: [UserTurn<'a>; 1],
}

#[derive(Serialize)]
struct UserTurn<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<Block>,
    usage: TokenUsage,
}

#[derive(Deserialize)]
struct Block {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct TokenUsage {
    input_tokens: u32,
    output_tokens: u32,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

impl MessagesResponse {
    /// Concatenated text blocks; tool and thinking blocks are skipped.
    fn into_text(self) -> Option<String> {
        let text: String = self
            .content
            .into_iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text)
            .collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

/// Shared Anthropic client. Cheap to clone.
#[derive(Clone)]
pub struct LlmClient {
    http: Client,
    api_key: String,
    model: String,
}

impl LlmClient {
    pub fn new(api_key: String, model: String) -> Result<Self, LlmError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            api_key,
            model,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Sends one user turn and returns the model's text reply.
    pub async fn complete(&self, system: &str, prompt: &str) -> Result<String, LlmError> {
        let body = MessagesRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            system,
            messages: [UserTurn {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .http
            .post(MESSAGES_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorEnvelope>(&raw)
                .map(|envelope| envelope.error.message)
                .unwrap_or(raw);
            return Err(LlmError::Api { status, message });
        }

        let reply: MessagesResponse = response.json().await?;
        debug!(
            "LLM call completed ({}): input_tokens={}, output_tokens={}",
            self.model, reply.usage.input_tokens, reply.usage.output_tokens
        );
        reply.into_text().ok_or(LlmError::NoText)
    }

    /// Like `complete`, but decodes the first JSON object in the reply.
    pub async fn complete_json<T: DeserializeOwned>(
        &self,
        system: &str,
        prompt: &str,
    ) -> Result<T, LlmError> {
        let text = self.complete(system, prompt).await?;
        let object = json_object(&text).ok_or(LlmError::NoJson)?;
        Ok(serde_json::from_str(object)?)
    }
}

/// The outermost `{ ... }` span of a reply. Models sometimes wrap JSON in
/// code fences or a sentence of prose despite the system prompt.
fn json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_object_inside_fence() {
        let reply = "```json\n{\"minimum_qualifications\": []}\n```";
        assert_eq!(json_object(reply), Some("{\"minimum_qualifications\": []}"));
    }

    #[test]
    fn test_json_object_after_prose() {
        let reply = "Here is the listing:\n{\"title\": \"Rust {core} Engineer\"} Hope that helps.";
        assert_eq!(json_object(reply), Some("{\"title\": \"Rust {core} Engineer\"}"));
    }

    #[test]
    fn test_reply_without_object_has_no_json() {
        assert_eq!(json_object("I cannot judge this resume."), None);
        assert_eq!(json_object("} backwards {"), None);
    }

    #[test]
    fn test_reply_text_joins_text_blocks_only() {
        let raw = r#"{
            "content": [
                {"type": "thinking"},
                {"type": "text", "text": "{\"title\": "},
                {"type": "text", "text": "\"QA Lead\"}"}
            ],
            "usage": {"input_tokens": 120, "output_tokens": 9}
        }"#;
        let reply: MessagesResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(reply.into_text().as_deref(), Some("{\"title\": \"QA Lead\"}"));
    }

    #[test]
    fn test_blank_reply_has_no_text() {
        let raw = r#"{"content": [{"type": "text", "text": "  "}], "usage": {"input_tokens": 1, "output_tokens": 1}}"#;
        let reply: MessagesResponse = serde_json::from_str(raw).unwrap();
        assert!(reply.into_text().is_none());
    }

    #[test]
    fn test_client_keeps_configured_model() {
        let client = LlmClient::new("key".into(), "claude-haiku-4-5".into()).unwrap();
        assert_eq!(client.model(), "claude-haiku-4-5");
    }
}
