//! Trajectory entry structures

use crate::llm::{LlmMessage, ToolDefinition, Usage};
use crate::tools::{ToolCall, ToolResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single entry in a query trajectory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrajectoryEntry {
    /// Unique identifier for this entry
    pub id: String,

    /// Timestamp when this entry was created
    pub timestamp: DateTime<Utc>,

    /// Type of entry
    pub entry_type: EntryType,

    /// Tool round the entry belongs to; 0 before the first request
    pub round: usize,
}

/// Type of trajectory entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EntryType {
    /// Query started
    QueryStart {
        query: String,
        system: String,
    },

    /// LLM request sent
    LlmRequest {
        messages: Vec<LlmMessage>,
        tools: Vec<String>,
        model: String,
        provider: String,
    },

    /// LLM response received
    LlmResponse {
        message: LlmMessage,
        usage: Option<Usage>,
        finish_reason: Option<String>,
    },

    /// Tool call initiated
    ToolCall {
        call: ToolCall,
    },

    /// Tool result received
    ToolResult {
        result: ToolResult,
    },

    /// Round budget exhausted, answering without tools
    ForcedCompletion {
        max_tool_rounds: usize,
    },

    /// Query answered
    QueryComplete {
        answer: String,
        requests: usize,
        duration_ms: u64,
    },

    /// Error occurred
    Error {
        error: String,
        context: Option<String>,
    },
}

impl TrajectoryEntry {
    /// Create a new trajectory entry
    pub fn new(entry_type: EntryType, round: usize) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            entry_type,
            round,
        }
    }

    /// Create a query start entry
    pub fn query_start(query: String, system: String) -> Self {
        Self::new(EntryType::QueryStart { query, system }, 0)
    }

    /// Create an LLM request entry
    pub fn llm_request(
        messages: Vec<LlmMessage>,
        tools: Option<&[ToolDefinition]>,
        model: String,
        provider: String,
        round: usize,
    ) -> Self {
        let tools = tools
            .unwrap_or_default()
            .iter()
            .map(|tool| tool.name.clone())
            .collect();
        Self::new(
            EntryType::LlmRequest {
                messages,
                tools,
                model,
                provider,
            },
            round,
        )
    }

    /// Create an LLM response entry
    pub fn llm_response(
        message: LlmMessage,
        usage: Option<Usage>,
        finish_reason: Option<String>,
        round: usize,
    ) -> Self {
        Self::new(
            EntryType::LlmResponse {
                message,
                usage,
                finish_reason,
            },
            round,
        )
    }

    /// Create a tool call entry
    pub fn tool_call(call: ToolCall, round: usize) -> Self {
        Self::new(EntryType::ToolCall { call }, round)
    }

    /// Create a tool result entry
    pub fn tool_result(result: ToolResult, round: usize) -> Self {
        Self::new(EntryType::ToolResult { result }, round)
    }

    /// Create a forced completion entry
    pub fn forced_completion(max_tool_rounds: usize) -> Self {
        Self::new(EntryType::ForcedCompletion { max_tool_rounds }, max_tool_rounds)
    }

    /// Create a query complete entry
    pub fn query_complete(answer: String, requests: usize, duration_ms: u64, round: usize) -> Self {
        Self::new(
            EntryType::QueryComplete {
                answer,
                requests,
                duration_ms,
            },
            round,
        )
    }

    /// Create an error entry
    pub fn error(error: String, context: Option<String>, round: usize) -> Self {
        Self::new(EntryType::Error { error, context }, round)
    }
}
