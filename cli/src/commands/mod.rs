//! CLI command implementations

pub mod ask;
pub mod chat;
pub mod courses;
pub mod tools;

pub use ask::ask_command;
pub use chat::chat_command;
pub use courses::courses_command;
pub use tools::tools_command;

use crate::catalog::{Catalog, InMemoryCourseStore};
use crate::config::CliConfigLoader;
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use syllabus_core::llm::AnthropicClient;
use syllabus_core::{RagSystem, Source, TrajectoryRecorder};
use tracing::{info, warn};

/// Settings shared by every command
pub struct CommandContext {
    pub config_loader: CliConfigLoader,
    pub courses: Option<PathBuf>,
    pub trajectory_file: Option<PathBuf>,
}

impl CommandContext {
    /// Load the course catalog, or an empty one when none was given
    pub async fn load_store(&self, max_results: usize) -> Result<Arc<InMemoryCourseStore>> {
        let store = match &self.courses {
            Some(path) => InMemoryCourseStore::load(path, max_results).await?,
            None => {
                warn!("No course catalog given, searches will find nothing (use --courses)");
                InMemoryCourseStore::new(Catalog::default(), max_results)
            }
        };
        Ok(Arc::new(store))
    }

    /// Build the RAG system from configuration, catalog and trajectory settings
    pub async fn build_rag_system(&self) -> Result<RagSystem> {
        let config = self.config_loader.load().await?;
        info!("🤖 Using protocol: {}", config.llm.protocol.as_str());
        info!("🤖 Using model: {}", config.llm.model);

        let client = Arc::new(
            AnthropicClient::new(&config.llm).context("Failed to create LLM client")?,
        );
        let store = self.load_store(config.rag.max_results).await?;

        let mut rag = RagSystem::new(client, store, config.rag)
            .context("Failed to create RAG system")?;

        if let Some(trajectory_file) = &self.trajectory_file {
            info!("📊 Trajectory file: {}", trajectory_file.display());
            rag = rag.with_trajectory_recorder(Arc::new(TrajectoryRecorder::with_file(
                trajectory_file,
            )));
        }

        Ok(rag)
    }
}

/// Render citation sources as a numbered list
pub fn format_sources(sources: &[Source]) -> String {
    sources
        .iter()
        .enumerate()
        .map(|(index, source)| match &source.url {
            Some(url) => format!("  {}. {} ({})", index + 1, source.title, url),
            None => format!("  {}. {}", index + 1, source.title),
        })
        .collect::<Vec<_>>()
        .join("\n")
}
