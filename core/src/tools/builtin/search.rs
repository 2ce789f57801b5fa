//! Course content search tool

use crate::error::Result;
use crate::store::{ChunkMetadata, CourseStore, SearchResults};
use crate::tools::{Source, Tool, ToolCall, ToolResult};
use async_trait::async_trait;
use serde_json::json;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Tool that searches course content, with optional course and lesson filters
///
/// Every hit returned to the model is also recorded as a citation source.
/// Sources accumulate across executions until [`Tool::reset_sources`] is
/// called, so a query that searches twice cites both searches.
pub struct CourseSearchTool {
    store: Arc<dyn CourseStore>,
    last_sources: Mutex<Vec<Source>>,
}

impl CourseSearchTool {
    pub fn new(store: Arc<dyn CourseStore>) -> Self {
        Self {
            store,
            last_sources: Mutex::new(Vec::new()),
        }
    }

    async fn format_results(&self, results: &SearchResults) -> (String, Vec<Source>) {
        let mut formatted = Vec::with_capacity(results.documents.len());
        let mut sources: Vec<Source> = Vec::new();

        for (document, metadata) in results.hits() {
            let label = hit_label(metadata);
            formatted.push(format!("[{}]\n{}", label, document));

            if sources.iter().any(|source| source.title == label) {
                continue;
            }
            let url = match metadata.lesson_number {
                Some(lesson) => self.store.lesson_link(&metadata.course_title, lesson).await,
                None => None,
            };
            sources.push(Source { title: label, url });
        }

        (formatted.join("\n\n"), sources)
    }

    fn record_sources(&self, sources: Vec<Source>) {
        if let Ok(mut recorded) = self.last_sources.lock() {
            for source in sources {
                if !recorded.iter().any(|known| known.title == source.title) {
                    recorded.push(source);
                }
            }
        }
    }
}

fn hit_label(metadata: &ChunkMetadata) -> String {
    match metadata.lesson_number {
        Some(lesson) => format!("{} - Lesson {}", metadata.course_title, lesson),
        None => metadata.course_title.clone(),
    }
}

fn no_results_message(course_name: Option<&str>, lesson_number: Option<u32>) -> String {
    let mut message = String::from("No relevant content found");
    if let Some(course) = course_name {
        message.push_str(&format!(" in course '{}'", course));
    }
    if let Some(lesson) = lesson_number {
        message.push_str(&format!(" in lesson {}", lesson));
    }
    message.push('.');
    message
}

#[async_trait]
impl Tool for CourseSearchTool {
    fn name(&self) -> &str {
        "search_course_content"
    }

    fn description(&self) -> &str {
        "Search course materials with smart course name matching and lesson filtering"
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "What to search for in the course content"
                },
                "course_name": {
                    "type": "string",
                    "description": "Course title (partial matches work, e.g. 'MCP', 'Introduction')"
                },
                "lesson_number": {
                    "type": "integer",
                    "description": "Specific lesson number to search within (e.g. 1, 2, 3)"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, call: ToolCall) -> Result<ToolResult> {
        let query: String = call.get_parameter("query")?;
        let course_name: Option<String> = call.get_optional_parameter("course_name")?;
        let lesson_number: Option<u32> = call.get_optional_parameter("lesson_number")?;

        debug!(%query, ?course_name, ?lesson_number, "searching course content");
        let results = self
            .store
            .search(&query, course_name.as_deref(), lesson_number)
            .await;

        if let Some(error) = results.error {
            return Ok(ToolResult::error(call.id, error));
        }

        if results.is_empty() {
            let message = no_results_message(course_name.as_deref(), lesson_number);
            return Ok(ToolResult::success(call.id, message));
        }

        let (content, sources) = self.format_results(&results).await;
        self.record_sources(sources);

        Ok(ToolResult::success(call.id, content))
    }

    fn last_sources(&self) -> Vec<Source> {
        self.last_sources
            .lock()
            .map(|sources| sources.clone())
            .unwrap_or_default()
    }

    fn reset_sources(&self) {
        if let Ok(mut sources) = self.last_sources.lock() {
            sources.clear();
        }
    }
}
