//! Scripted LLM client shared by unit tests

use crate::error::{LlmError, Result};
use crate::llm::{
    ChatOptions, ContentBlock, FinishReason, LlmClient, LlmMessage, LlmResponse, ToolChoice,
    ToolDefinition,
};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub system: String,
    pub messages: Vec<LlmMessage>,
    pub tools: Option<Vec<ToolDefinition>>,
    pub tool_choice: Option<ToolChoice>,
}

/// LLM client that replays scripted responses and records every request
pub struct ScriptedClient {
    responses: Mutex<VecDeque<Result<LlmResponse>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedClient {
    pub fn new(responses: Vec<LlmResponse>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into_iter().map(Ok).collect()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(error: LlmError) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(VecDeque::from([Err(error.into())])),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmClient for ScriptedClient {
    async fn chat_completion(
        &self,
        system: &str,
        messages: Vec<LlmMessage>,
        tools: Option<Vec<ToolDefinition>>,
        options: Option<ChatOptions>,
    ) -> Result<LlmResponse> {
        self.requests.lock().unwrap().push(RecordedRequest {
            system: system.to_string(),
            messages,
            tools,
            tool_choice: options.and_then(|o| o.tool_choice),
        });

        let next = self.responses.lock().unwrap().pop_front();
        next.unwrap_or_else(|| {
            Err(LlmError::InvalidRequest {
                message: "script exhausted".to_string(),
            }
            .into())
        })
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }

    fn provider_name(&self) -> &str {
        "mock"
    }
}

pub fn text_response(text: &str) -> LlmResponse {
    LlmResponse {
        message: LlmMessage::assistant_blocks(vec![ContentBlock::text(text)]),
        usage: None,
        model: "mock-model".to_string(),
        finish_reason: Some(FinishReason::Stop),
    }
}

pub fn tool_response(blocks: Vec<ContentBlock>) -> LlmResponse {
    LlmResponse {
        message: LlmMessage::assistant_blocks(blocks),
        usage: None,
        model: "mock-model".to_string(),
        finish_reason: Some(FinishReason::ToolUse),
    }
}
