//! LLM client abstractions and implementations

pub mod client;
pub mod message;
pub mod providers;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{
    ChatOptions, FinishReason, LlmClient, LlmResponse, ToolChoice, ToolDefinition, Usage,
};
pub use message::{ContentBlock, LlmMessage, MessageContent, MessageRole};
pub use providers::*;
