//! Interactive chat command

use super::{format_sources, CommandContext};
use crate::history::ConversationHistory;
use anyhow::Result;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};

/// A line typed at the chat prompt
#[derive(Debug, PartialEq)]
enum ChatInput<'a> {
    Quit,
    Clear,
    Skip,
    Question(&'a str),
}

fn parse_input(line: &str) -> ChatInput<'_> {
    match line.trim() {
        "" => ChatInput::Skip,
        "/quit" | "/exit" => ChatInput::Quit,
        "/clear" => ChatInput::Clear,
        question => ChatInput::Question(question),
    }
}

/// Read questions from stdin until `/quit` or end of input
pub async fn chat_command(context: CommandContext) -> Result<()> {
    let rag = context.build_rag_system().await?;
    let mut history = ConversationHistory::new(rag.config().max_history);

    println!("💬 Ask about your courses. /clear resets the conversation, /quit exits.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match parse_input(&line) {
            ChatInput::Skip => continue,
            ChatInput::Quit => break,
            ChatInput::Clear => {
                history.clear();
                println!("🧹 Conversation cleared.");
            }
            ChatInput::Question(question) => {
                let rendered = history.render();
                match rag.query(question, rendered.as_deref()).await {
                    Ok((answer, sources)) => {
                        println!("{}", answer);
                        if !sources.is_empty() {
                            println!("\n📚 Sources:\n{}", format_sources(&sources));
                        }
                        println!();
                        history.push(question, &answer);
                    }
                    Err(e) => {
                        error!("Query failed: {}", e);
                        eprintln!("❌ Query failed: {}", e);
                    }
                }
            }
        }
    }

    info!("Chat session ended");
    Ok(())
}
