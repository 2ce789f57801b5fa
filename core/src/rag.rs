//! Retrieval-augmented question answering over course materials

use crate::agent::{build_query_prompt, AgentBuilder, AgentCore, AgentExecution};
use crate::config::RagConfig;
use crate::error::Result;
use crate::llm::LlmClient;
use crate::store::CourseStore;
use crate::tools::{CourseOutlineTool, CourseSearchTool, Source, ToolRegistry};
use crate::trajectory::TrajectoryRecorder;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Catalog statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseAnalytics {
    pub total_courses: usize,
    pub course_titles: Vec<String>,
}

impl CourseAnalytics {
    /// Collect statistics straight from a store
    pub async fn from_store(store: &dyn CourseStore) -> Self {
        let course_titles = store.course_titles().await;
        Self {
            total_courses: course_titles.len(),
            course_titles,
        }
    }
}

/// Registry holding the content search and course outline tools
pub fn course_tools(store: Arc<dyn CourseStore>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(CourseSearchTool::new(store.clone())));
    registry.register(Box::new(CourseOutlineTool::new(store)));
    registry
}

/// Answers questions with the course tools and collects citations
///
/// Sources are gathered in the registry's tools between a query's start and
/// its return. Queries on one `RagSystem` should not overlap, or their
/// sources will mix.
pub struct RagSystem {
    agent: AgentCore,
    registry: ToolRegistry,
    store: Arc<dyn CourseStore>,
    config: RagConfig,
}

impl RagSystem {
    /// Create a RAG system with the search and outline tools registered
    pub fn new(
        llm_client: Arc<dyn LlmClient>,
        store: Arc<dyn CourseStore>,
        config: RagConfig,
    ) -> Result<Self> {
        config.validate()?;

        let agent = AgentBuilder::new(llm_client)
            .with_max_tool_rounds(config.max_tool_rounds)
            .build()?;

        Ok(Self {
            agent,
            registry: course_tools(store.clone()),
            store,
            config,
        })
    }

    /// Record every query into the given trajectory recorder
    pub fn with_trajectory_recorder(mut self, recorder: Arc<TrajectoryRecorder>) -> Self {
        self.agent = self.agent.with_trajectory_recorder(recorder);
        self
    }

    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Answer a question, returning the answer and the sources it drew on
    pub async fn query(
        &self,
        query: &str,
        history: Option<&str>,
    ) -> Result<(String, Vec<Source>)> {
        let (execution, sources) = self.query_with_stats(query, history).await?;
        Ok((execution.answer, sources))
    }

    /// Same as [`RagSystem::query`], with loop statistics
    pub async fn query_with_stats(
        &self,
        query: &str,
        history: Option<&str>,
    ) -> Result<(AgentExecution, Vec<Source>)> {
        let prompt = build_query_prompt(query);
        let definitions = self.registry.definitions();

        let result = self
            .agent
            .generate_response_with_stats(
                &prompt,
                history,
                Some(&definitions),
                Some(&self.registry),
            )
            .await;

        let sources = self.registry.last_sources();
        self.registry.reset_sources();
        let execution = result?;

        debug!(sources = sources.len(), "collected sources");
        Ok((execution, sources))
    }

    /// Titles and count of every course in the store
    pub async fn course_analytics(&self) -> CourseAnalytics {
        CourseAnalytics::from_store(self.store.as_ref()).await
    }
}
