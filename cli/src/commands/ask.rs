//! Single question command

use super::{format_sources, CommandContext};
use anyhow::Result;
use tracing::{debug, info};

/// Answer one question and print its sources
pub async fn ask_command(question: String, context: CommandContext) -> Result<()> {
    info!("Answering question: {}", question);

    let rag = context.build_rag_system().await?;
    let (execution, sources) = rag.query_with_stats(&question, None).await?;

    debug!(
        rounds = execution.rounds,
        requests = execution.requests,
        tool_calls = execution.tool_calls,
        forced = execution.forced_completion,
        "answered in {} ms",
        execution.duration_ms
    );

    println!("{}", execution.answer);
    if !sources.is_empty() {
        println!("\n📚 Sources:\n{}", format_sources(&sources));
    }

    Ok(())
}
