//! Built-in tools

pub mod outline;
pub mod search;

pub use outline::CourseOutlineTool;
pub use search::CourseSearchTool;
