//! Tool-calling conversation loop

pub mod config;
pub mod core;
pub mod execution;
pub mod prompt;

pub use config::{AgentBuilder, AgentConfig};
pub use core::AgentCore;
pub use execution::AgentExecution;
pub use prompt::{build_query_prompt, build_system_content, SYSTEM_PROMPT};
