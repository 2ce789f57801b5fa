//! # syllabus CLI
//!
//! Command-line interface for syllabus - question answering over course
//! materials with LLM tool calling.
//!
//! ## Usage
//!
//! - `syllabus ask "question"` - Answer a single question
//! - `syllabus chat` - Start an interactive conversation
//! - `syllabus tools` - Show available tools
//! - `syllabus courses` - Show the course catalog

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

mod catalog;
mod commands;
mod config;
mod history;

use commands::{ask_command, chat_command, courses_command, tools_command, CommandContext};
use config::CliConfigLoader;

/// syllabus - Ask questions about your course materials
#[derive(Parser)]
#[command(name = "syllabus")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Answer questions about course materials with an LLM and search tools")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file or directory path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// API key override
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Base URL override
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Model name override
    #[arg(long, global = true)]
    model: Option<String>,

    /// Course catalog JSON file
    #[arg(long, global = true, env = "SYLLABUS_COURSES")]
    courses: Option<PathBuf>,

    /// Maximum number of tool rounds per question
    #[arg(long, global = true)]
    max_rounds: Option<usize>,

    /// Output trajectory file
    #[arg(long, global = true)]
    trajectory_file: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer a single question
    Ask {
        /// The question to answer
        question: String,
    },

    /// Start an interactive conversation
    Chat,

    /// Show available tools
    Tools,

    /// Show the courses in the catalog
    Courses,
}

/// Expand `~` and environment variables in a user-supplied path
fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    match shellexpand::full(&raw) {
        Ok(expanded) => PathBuf::from(expanded.into_owned()),
        Err(_) => path.to_path_buf(),
    }
}

/// Build a configuration loader from CLI arguments
fn build_config_loader(cli: &Cli) -> CliConfigLoader {
    let mut loader = CliConfigLoader::new();

    if let Some(config_path) = &cli.config {
        loader = loader.with_config_override(expand_path(config_path));
    }

    if let Some(api_key) = &cli.api_key {
        loader = loader.with_api_key_override(api_key.clone());
    }

    if let Some(base_url) = &cli.base_url {
        loader = loader.with_base_url_override(base_url.clone());
    }

    if let Some(model) = &cli.model {
        loader = loader.with_model_override(model.clone());
    }

    if let Some(max_rounds) = cli.max_rounds {
        loader = loader.with_max_rounds_override(max_rounds);
    }

    loader
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so answers can be piped
    syllabus_core::init_tracing_with_debug(cli.verbose);

    let context = CommandContext {
        config_loader: build_config_loader(&cli),
        courses: cli.courses.as_deref().map(expand_path),
        trajectory_file: cli.trajectory_file.as_deref().map(expand_path),
    };

    match cli.command {
        Commands::Ask { question } => ask_command(question, context).await,
        Commands::Chat => chat_command(context).await,
        Commands::Tools => tools_command(context).await,
        Commands::Courses => courses_command(context).await,
    }
}
