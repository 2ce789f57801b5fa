//! LLM client trait and response structures

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::message::{ContentBlock, LlmMessage};

/// Trait for LLM clients
///
/// One call is one request/response round trip. Transport and provider
/// failures come back as `Err`; the conversation loop does not mask them.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send a chat completion request
    async fn chat_completion(
        &self,
        system: &str,
        messages: Vec<LlmMessage>,
        tools: Option<Vec<ToolDefinition>>,
        options: Option<ChatOptions>,
    ) -> Result<LlmResponse>;

    /// Get the model name
    fn model_name(&self) -> &str;

    /// Get the provider name
    fn provider_name(&self) -> &str;
}

/// Response from an LLM
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmResponse {
    /// The generated message, content kept in model order
    pub message: LlmMessage,

    /// Usage statistics
    pub usage: Option<Usage>,

    /// Model used for generation
    pub model: String,

    /// Finish reason
    pub finish_reason: Option<FinishReason>,
}

impl LlmResponse {
    /// Whether the model stopped to request tool execution
    pub fn wants_tools(&self) -> bool {
        matches!(self.finish_reason, Some(FinishReason::ToolUse))
    }

    /// First text block of the response, or an empty string
    pub fn text(&self) -> String {
        self.message.first_text().unwrap_or_default().to_string()
    }

    /// Content blocks of the response
    pub fn blocks(&self) -> &[ContentBlock] {
        self.message.blocks()
    }
}

/// Usage statistics for a request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Usage {
    /// Number of tokens in the prompt
    pub prompt_tokens: u32,

    /// Number of tokens in the completion
    pub completion_tokens: u32,

    /// Total number of tokens
    pub total_tokens: u32,
}

/// Reason why generation finished
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// Generation completed naturally
    Stop,

    /// Hit the maximum token limit
    Length,

    /// Model decided to call a tool
    ToolUse,

    /// Hit one of the configured stop sequences
    StopSequence,

    /// Other reason
    Other(String),
}

impl FinishReason {
    /// Map a provider stop reason string
    pub fn from_stop_reason(reason: &str) -> Self {
        match reason {
            "end_turn" => FinishReason::Stop,
            "max_tokens" => FinishReason::Length,
            "tool_use" => FinishReason::ToolUse,
            "stop_sequence" => FinishReason::StopSequence,
            other => FinishReason::Other(other.to_string()),
        }
    }
}

/// Tool definition for function calling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Name of the tool
    pub name: String,

    /// Description of what the tool does
    pub description: String,

    /// JSON schema for the tool input
    pub input_schema: serde_json::Value,
}

/// Options for chat completion
///
/// Unset fields fall back to the client's configured model parameters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatOptions {
    /// Maximum tokens to generate
    pub max_tokens: Option<u32>,

    /// Temperature for generation
    pub temperature: Option<f32>,

    /// Top-p sampling parameter
    pub top_p: Option<f32>,

    /// Stop sequences
    pub stop: Option<Vec<String>>,

    /// Tool choice strategy, only sent together with tools
    pub tool_choice: Option<ToolChoice>,
}

/// Tool choice strategy; the loop only ever lets the model decide
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ToolChoice {
    Auto,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tool_choice_wire_format() {
        assert_eq!(
            serde_json::to_value(ToolChoice::Auto).unwrap(),
            json!({"type": "auto"})
        );
    }

    #[test]
    fn test_finish_reason_mapping() {
        assert_eq!(FinishReason::from_stop_reason("end_turn"), FinishReason::Stop);
        assert_eq!(FinishReason::from_stop_reason("tool_use"), FinishReason::ToolUse);
        assert_eq!(
            FinishReason::from_stop_reason("pause_turn"),
            FinishReason::Other("pause_turn".to_string())
        );
    }

    #[test]
    fn test_response_text_defaults_to_empty() {
        let response = LlmResponse {
            message: LlmMessage::assistant_blocks(Vec::new()),
            usage: None,
            model: "m".to_string(),
            finish_reason: Some(FinishReason::Stop),
        };

        assert_eq!(response.text(), "");
        assert!(!response.wants_tools());
    }
}
