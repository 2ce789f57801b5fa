//! Tool system and built-in tools

pub mod base;
pub mod builtin;
pub mod registry;

pub use base::{Source, Tool, ToolCall, ToolResult};
pub use builtin::{CourseOutlineTool, CourseSearchTool};
pub use registry::ToolRegistry;
