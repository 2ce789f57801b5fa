//! # Syllabus Core
//!
//! Core library for Syllabus - a question answering backend for course
//! materials.
//!
//! The centre of the crate is the tool-calling conversation loop in
//! [`agent::AgentCore`]: it sends a query to an LLM, executes any tools the
//! model asks for through a [`tools::ToolRegistry`], feeds the results back,
//! and stops after a bounded number of tool rounds with a text answer.
//! [`rag::RagSystem`] wires the loop to a [`store::CourseStore`] and collects
//! the citation sources produced along the way.

// Core modules
pub mod agent;
pub mod config;
pub mod error;
pub mod llm;
pub mod rag;
pub mod store;
pub mod tools;
pub mod trajectory;

// Re-export commonly used types
pub use agent::{AgentBuilder, AgentConfig, AgentCore, AgentExecution};
pub use config::{ModelParams, Protocol, RagConfig, ResolvedLlmConfig};
pub use rag::{course_tools, CourseAnalytics, RagSystem};
pub use store::{ChunkMetadata, CourseOutline, CourseStore, LessonEntry, SearchResults};
pub use tools::{Source, Tool, ToolRegistry};
pub use trajectory::TrajectoryRecorder;

/// Current version of the syllabus-core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize tracing with a specific debug mode
pub fn init_tracing_with_debug(debug: bool) {
    let filter = if debug { "debug" } else { "info" };

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();
}
