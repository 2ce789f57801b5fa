//! Tools listing command

use super::CommandContext;
use anyhow::Result;
use syllabus_core::course_tools;
use tracing::info;

/// Show available tools
pub async fn tools_command(context: CommandContext) -> Result<()> {
    info!("Listing available tools");

    let rag_config = context.config_loader.load_rag_config().await?;
    let store = context.load_store(rag_config.max_results).await?;
    let registry = course_tools(store);

    println!("🛠️  Available Tools\n");

    for name in registry.list_tools() {
        if let Some(tool) = registry.get(name) {
            println!("📦 {}", name);
            // Show first line of description only for brevity
            let description = tool.description();
            let first_line = description.lines().next().unwrap_or(description);
            println!("   {}\n", first_line);
        }
    }

    println!(
        "💡 The model may call these tools up to {} time(s) per question.",
        rag_config.max_tool_rounds
    );

    Ok(())
}
