//! Terminal chat loop.
//!
//! Keeps the conversation history in-process and runs every message through
//! the same `ChatService::run_turn` path as the HTTP surface, so memories
//! saved here show up in `GET /chat_api/memories` and vice versa.

use std::io::Write;
use std::time::{Duration, Instant};

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use rustyline_async::SharedWriter;
use tracing::{debug, warn};

use keepsake_core::chat::service::{MemoryWrite, TurnError};
use keepsake_core::llm::provider::LlmProvider;
use keepsake_core::memory::persistence::MemoryPersistence;
use keepsake_types::llm::{Message, MessageRole};

use crate::state::AppState;

use super::commands::{self, ChatCommand};
use super::input::{ChatInput, InputEvent};

/// Run the interactive chat loop until EOF or `/exit`.
pub async fn run_chat_loop(state: &AppState) -> anyhow::Result<()> {
    let service = &state.chat_service;
    let live = service.memories().await.map(|m| m.len()).unwrap_or_else(|e| {
        warn!(error = %e, "Could not read memories for the banner");
        0
    });

    print_banner(
        service.provider().name(),
        &service.settings().model,
        &service.store().persistence().describe(),
        live,
    );

    let prompt = format!("  {} ", style("You >").green().bold());
    let (mut input, mut out) =
        ChatInput::new(prompt).map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;

    let mut history: Vec<Message> = Vec::new();

    loop {
        let text = match input.read_line().await {
            InputEvent::Eof => break,
            InputEvent::Interrupted => {
                let _ = writeln!(out, "  {}", style("Press Ctrl+D or type /exit to leave.").dim());
                continue;
            }
            InputEvent::Message(text) if text.is_empty() => continue,
            InputEvent::Message(text) => text,
        };

        if let Some(cmd) = commands::parse(&text) {
            match cmd {
                ChatCommand::Help => {
                    let _ = write!(out, "\n{}\n", commands::help_text());
                }
                ChatCommand::Clear => input.clear(),
                ChatCommand::Exit => break,
                ChatCommand::Memories => show_memories(state, &mut out).await,
                ChatCommand::History => show_history(&history, &mut out),
                ChatCommand::Reset => {
                    history.clear();
                    let _ = writeln!(out, "\n  {}\n", style("Conversation reset. Memories are kept.").dim());
                }
                ChatCommand::Unknown(name) => {
                    let _ = writeln!(
                        out,
                        "\n  {} Unknown command: {}. Type /help for available commands.\n",
                        style("?").yellow().bold(),
                        style(name).dim()
                    );
                }
            }
            continue;
        }

        let spinner = thinking_spinner();
        let started = Instant::now();
        let result = service.run_turn(&text, &history).await;
        spinner.finish_and_clear();

        match result {
            Ok(outcome) => {
                debug!(elapsed_ms = started.elapsed().as_millis() as u64, "Reply received");
                let _ = writeln!(out, "\n  {} {}\n", style("Bot >").cyan().bold(), outcome.reply);
                match &outcome.memory {
                    MemoryWrite::Saved(record) => {
                        let _ = writeln!(
                            out,
                            "  {} Remembered for {}: {}\n",
                            style("*").cyan().bold(),
                            record.timeframe,
                            style(&record.content).dim()
                        );
                    }
                    MemoryWrite::Failed { error, .. } => {
                        let _ = writeln!(
                            out,
                            "  {} Could not save memory: {error}\n",
                            style("!").yellow().bold()
                        );
                    }
                    MemoryWrite::Nothing | MemoryWrite::AlreadyKnown(_) => {}
                }
                history = outcome.history;
            }
            Err(TurnError::EmptyMessage) => {}
            Err(e) => {
                let _ = writeln!(out, "\n  {} {e}", style("!").red().bold());
                let _ = writeln!(out, "  {}\n", style("Type a message to retry, /exit to quit.").dim());
            }
        }
    }

    let _ = writeln!(out, "\n  {}", style("Session ended.").dim());
    input.flush();
    Ok(())
}

fn print_banner(provider: &str, model: &str, location: &str, live: usize) {
    println!();
    println!("  {}", style("keepsake").cyan().bold());
    println!(
        "  {} {}  {} {}",
        style("model:").dim(),
        style(format!("{provider}/{model}")).bold(),
        style("memories:").dim(),
        live
    );
    println!("  {} {}", style("store:").dim(), location);
    println!("  {}", style("Type /help for commands, /exit to quit.").dim());
    println!();
}

fn thinking_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("  {spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("thinking...");
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

async fn show_memories(state: &AppState, out: &mut SharedWriter) {
    match state.chat_service.memories().await {
        Ok(records) if records.is_empty() => {
            let _ = writeln!(out, "\n  {}\n", style("Nothing remembered right now.").dim());
        }
        Ok(records) => {
            let _ = writeln!(out);
            for record in &records {
                let _ = writeln!(
                    out,
                    "  {} {} {}",
                    style(record.created_at.format("%Y-%m-%d")).dim(),
                    style(format!("[{}]", record.timeframe)).cyan(),
                    record.content
                );
            }
            let _ = writeln!(out);
        }
        Err(e) => {
            let _ = writeln!(out, "\n  {} Could not read memories: {e}\n", style("!").red().bold());
        }
    }
}

fn show_history(history: &[Message], out: &mut SharedWriter) {
    if history.is_empty() {
        let _ = writeln!(out, "\n  {}\n", style("No messages yet.").dim());
        return;
    }
    let _ = writeln!(out);
    for message in history {
        let label = match message.role {
            MessageRole::User => style("You").green().bold(),
            MessageRole::Assistant => style("Bot").cyan().bold(),
            MessageRole::System => style("System").dim(),
        };
        let _ = writeln!(out, "  {label} {}", message.content);
    }
    let _ = writeln!(out);
}
