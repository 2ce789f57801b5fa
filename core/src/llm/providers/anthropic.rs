//! Anthropic Messages API client implementation

use crate::config::{ModelParams, ResolvedLlmConfig};
use crate::error::{LlmError, Result};
use crate::llm::{
    ChatOptions, ContentBlock, FinishReason, LlmClient, LlmMessage, LlmResponse, ToolChoice,
    ToolDefinition, Usage,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, error};

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic Claude client
pub struct AnthropicClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    params: ModelParams,
    headers: HashMap<String, String>,
}

impl AnthropicClient {
    /// Create a new Anthropic client
    pub fn new(config: &ResolvedLlmConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(LlmError::Authentication {
                message: "No API key found for Anthropic".to_string(),
            }
            .into());
        }

        Ok(Self {
            client: Client::new(),
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            params: config.params.clone(),
            headers: config.headers.clone(),
        })
    }
}

#[async_trait]
impl LlmClient for AnthropicClient {
    async fn chat_completion(
        &self,
        system: &str,
        messages: Vec<LlmMessage>,
        tools: Option<Vec<ToolDefinition>>,
        options: Option<ChatOptions>,
    ) -> Result<LlmResponse> {
        let request = self.build_request(system, messages, tools, options);
        debug!(
            model = %request.model,
            messages = request.messages.len(),
            tools = request.tools.as_ref().map_or(0, Vec::len),
            "sending Anthropic request"
        );

        let mut builder = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json");
        for (key, value) in &self.headers {
            builder = builder.header(key, value);
        }

        let response = builder
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::Network {
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), "Anthropic request failed");
            return Err(match status.as_u16() {
                401 | 403 => LlmError::Authentication { message },
                429 => LlmError::RateLimit,
                code => LlmError::ApiError {
                    status: code,
                    message,
                },
            }
            .into());
        }

        let anthropic_response: AnthropicResponse =
            response
                .json()
                .await
                .map_err(|e| LlmError::MalformedResponse {
                    message: format!("Failed to parse response: {}", e),
                })?;

        Ok(convert_response(anthropic_response))
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn provider_name(&self) -> &str {
        "anthropic"
    }
}

impl AnthropicClient {
    fn build_request(
        &self,
        system: &str,
        messages: Vec<LlmMessage>,
        tools: Option<Vec<ToolDefinition>>,
        options: Option<ChatOptions>,
    ) -> AnthropicRequest {
        let options = options.unwrap_or_default();

        // The API rejects an empty tools array, and tool_choice without tools.
        let tools = tools.filter(|t| !t.is_empty());
        let tool_choice = if tools.is_some() {
            options.tool_choice
        } else {
            None
        };

        AnthropicRequest {
            model: self.model.clone(),
            max_tokens: options.max_tokens.or(self.params.max_tokens).unwrap_or(800),
            temperature: options.temperature.or(self.params.temperature),
            top_p: options.top_p.or(self.params.top_p),
            system: (!system.is_empty()).then(|| system.to_string()),
            messages,
            tools,
            tool_choice,
            stop_sequences: options.stop.or_else(|| self.params.stop_sequences.clone()),
        }
    }
}

fn convert_response(response: AnthropicResponse) -> LlmResponse {
    let blocks = response
        .content
        .into_iter()
        .filter_map(|content| match content {
            AnthropicContent::Text { text } => Some(ContentBlock::Text { text }),
            AnthropicContent::ToolUse { id, name, input } => {
                Some(ContentBlock::ToolUse { id, name, input })
            }
            AnthropicContent::Unsupported => None,
        })
        .collect();

    let usage = response.usage.map(|u| Usage {
        prompt_tokens: u.input_tokens,
        completion_tokens: u.output_tokens,
        total_tokens: u.input_tokens + u.output_tokens,
    });

    LlmResponse {
        message: LlmMessage::assistant_blocks(blocks),
        usage,
        model: response.model,
        finish_reason: response
            .stop_reason
            .as_deref()
            .map(FinishReason::from_stop_reason),
    }
}

#[derive(Debug, Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<LlmMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<ToolDefinition>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<ToolChoice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop_sequences: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    model: String,
    content: Vec<AnthropicContent>,
    stop_reason: Option<String>,
    usage: Option<AnthropicUsage>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum AnthropicContent {
    Text {
        text: String,
    },
    ToolUse {
        id: String,
        name: String,
        input: serde_json::Value,
    },
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Deserialize)]
struct AnthropicUsage {
    input_tokens: u32,
    output_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Protocol;
    use crate::error::Error;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> AnthropicClient {
        let config = ResolvedLlmConfig::new(
            Protocol::Anthropic,
            server.uri(),
            "test_api_key".to_string(),
            "claude-test".to_string(),
        );
        AnthropicClient::new(&config).unwrap()
    }

    fn search_tool() -> ToolDefinition {
        ToolDefinition {
            name: "search_course_content".to_string(),
            description: "Search course materials".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {"query": {"type": "string"}},
                "required": ["query"]
            }),
        }
    }

    #[tokio::test]
    async fn test_text_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(header("x-api-key", "test_api_key"))
            .and(header("anthropic-version", ANTHROPIC_VERSION))
            .and(body_partial_json(json!({
                "model": "claude-test",
                "max_tokens": 800,
                "temperature": 0.0,
                "system": "Be brief.",
                "messages": [{"role": "user", "content": "Hello?"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "msg_123",
                "type": "message",
                "role": "assistant",
                "model": "claude-test",
                "content": [{"type": "text", "text": "Hello! How can I help?"}],
                "stop_reason": "end_turn",
                "stop_sequence": null,
                "usage": {"input_tokens": 12, "output_tokens": 15}
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let response = client
            .chat_completion("Be brief.", vec![LlmMessage::user("Hello?")], None, None)
            .await
            .unwrap();

        assert_eq!(response.text(), "Hello! How can I help?");
        assert_eq!(response.finish_reason, Some(FinishReason::Stop));
        assert_eq!(response.usage.unwrap().total_tokens, 27);
    }

    #[tokio::test]
    async fn test_tool_use_response_keeps_block_order() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(body_partial_json(json!({
                "tools": [{"name": "search_course_content"}],
                "tool_choice": {"type": "auto"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "model": "claude-test",
                "content": [
                    {"type": "text", "text": "Let me look that up."},
                    {"type": "thinking", "thinking": "hidden", "signature": "sig"},
                    {
                        "type": "tool_use",
                        "id": "toolu_01",
                        "name": "search_course_content",
                        "input": {"query": "machine learning"}
                    }
                ],
                "stop_reason": "tool_use",
                "usage": {"input_tokens": 20, "output_tokens": 10}
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let options = ChatOptions {
            tool_choice: Some(ToolChoice::Auto),
            ..Default::default()
        };
        let response = client
            .chat_completion(
                "",
                vec![LlmMessage::user("What is ML?")],
                Some(vec![search_tool()]),
                Some(options),
            )
            .await
            .unwrap();

        assert!(response.wants_tools());
        assert_eq!(
            response.blocks(),
            &[
                ContentBlock::text("Let me look that up."),
                ContentBlock::tool_use(
                    "toolu_01",
                    "search_course_content",
                    json!({"query": "machine learning"})
                ),
            ]
        );
    }

    #[tokio::test]
    async fn test_tool_choice_dropped_without_tools() {
        let server = MockServer::start().await;
        let client = client_for(&server);
        let options = ChatOptions {
            tool_choice: Some(ToolChoice::Auto),
            ..Default::default()
        };

        let request = client.build_request("", vec![LlmMessage::user("q")], None, Some(options));
        let body = serde_json::to_value(&request).unwrap();

        assert!(body.get("tools").is_none());
        assert!(body.get("tool_choice").is_none());
        assert!(body.get("system").is_none());
    }

    #[tokio::test]
    async fn test_api_error_is_propagated() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .respond_with(ResponseTemplate::new(529).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client
            .chat_completion("", vec![LlmMessage::user("q")], None, None)
            .await
            .unwrap_err();

        match err {
            Error::Llm(LlmError::ApiError { status, message }) => {
                assert_eq!(status, 529);
                assert_eq!(message, "overloaded");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_rate_limit_maps_to_rate_limit_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client
            .chat_completion("", vec![LlmMessage::user("q")], None, None)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Llm(LlmError::RateLimit)));
    }

    #[test]
    fn test_new_rejects_missing_key() {
        let config = ResolvedLlmConfig::new(
            Protocol::Anthropic,
            "https://api.anthropic.com".to_string(),
            String::new(),
            "claude-test".to_string(),
        );

        assert!(AnthropicClient::new(&config).is_err());
    }
}
