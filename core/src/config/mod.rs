//! Minimal configuration module for syllabus core
//!
//! Only exports pure data types. All loading logic is in CLI layer.

pub mod types;

pub use types::{ModelParams, Protocol, RagConfig, ResolvedLlmConfig};
