//! Course outline tool

use crate::error::Result;
use crate::store::{CourseOutline, CourseStore};
use crate::tools::{Tool, ToolCall, ToolResult};
use async_trait::async_trait;
use serde_json::json;
use std::fmt::Write;
use std::sync::Arc;

/// Tool that returns a course's title, link and lesson list
pub struct CourseOutlineTool {
    store: Arc<dyn CourseStore>,
}

impl CourseOutlineTool {
    pub fn new(store: Arc<dyn CourseStore>) -> Self {
        Self { store }
    }
}

fn format_outline(outline: &CourseOutline) -> String {
    let mut text = format!("Course: {}\n", outline.title);
    if let Some(link) = &outline.course_link {
        let _ = writeln!(text, "Link: {}", link);
    }
    if let Some(instructor) = &outline.instructor {
        let _ = writeln!(text, "Instructor: {}", instructor);
    }

    let _ = write!(text, "Lessons ({} total):", outline.lessons.len());
    for lesson in &outline.lessons {
        let _ = write!(text, "\nLesson {}: {}", lesson.number, lesson.title);
    }
    text
}

#[async_trait]
impl Tool for CourseOutlineTool {
    fn name(&self) -> &str {
        "get_course_outline"
    }

    fn description(&self) -> &str {
        "Get the outline of a course: its title, link and complete lesson list"
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "course_name": {
                    "type": "string",
                    "description": "Course title (partial matches work, e.g. 'MCP', 'Introduction')"
                }
            },
            "required": ["course_name"]
        })
    }

    async fn execute(&self, call: ToolCall) -> Result<ToolResult> {
        let course_name: String = call.get_parameter("course_name")?;

        match self.store.course_outline(&course_name).await {
            Some(outline) => Ok(ToolResult::success(call.id, format_outline(&outline))),
            None => Ok(ToolResult::success(
                call.id,
                format!("No course found matching '{}'", course_name),
            )),
        }
    }
}
