//! Agent execution result structures

use serde::{Deserialize, Serialize};

/// Outcome of one query through the conversation loop
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentExecution {
    /// Final answer text; empty when the model returned no text block
    pub answer: String,

    /// Number of completed tool rounds
    pub rounds: usize,

    /// Number of LLM requests issued, including a forced final one
    pub requests: usize,

    /// Number of tool-use blocks executed
    pub tool_calls: usize,

    /// Whether the round budget ran out and a tool-less answer was requested
    pub forced_completion: bool,

    /// Total execution time in milliseconds
    pub duration_ms: u64,
}
