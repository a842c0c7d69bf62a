//! Memory CLI commands: list, prune.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Subcommand;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use keepsake_core::memory::expiry::{Retention, retention};
use keepsake_types::memory::{MemoryRecord, Timeframe};

use crate::state::AppState;

#[derive(Subcommand)]
pub enum MemoryCommand {
    /// List live memories.
    #[command(alias = "ls")]
    List,

    /// Remove expired memories from storage.
    Prune,
}

/// Dispatch a memory subcommand.
pub async fn handle_memory_command(action: MemoryCommand, state: &AppState, json: bool) -> Result<()> {
    match action {
        MemoryCommand::List => list_memories(state, json).await,
        MemoryCommand::Prune => prune_memories(state, json).await,
    }
}

/// List live memories with their expiry.
///
/// # Examples
///
/// ```bash
/// keepsake memories list
/// keepsake memories list --json
/// ```
pub async fn list_memories(state: &AppState, json: bool) -> Result<()> {
    let memories = state
        .chat_service
        .memories()
        .await
        .context("Failed to load memories")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&memories)?);
        return Ok(());
    }

    if memories.is_empty() {
        println!();
        println!(
            "  {} No memories yet. They are saved when the assistant decides something is worth keeping.",
            style("i").blue().bold(),
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Memory").fg(Color::White),
        Cell::new("Timeframe").fg(Color::White),
        Cell::new("Saved").fg(Color::White),
        Cell::new("Expires").fg(Color::White),
    ]);

    for mem in &memories {
        let timeframe_cell = match &mem.timeframe {
            Timeframe::Day => Cell::new("day").fg(Color::Yellow),
            Timeframe::Week => Cell::new("week").fg(Color::Cyan),
            Timeframe::Month => Cell::new("month").fg(Color::Blue),
            Timeframe::Indefinitely => Cell::new("indefinitely").fg(Color::Magenta),
            Timeframe::Unrecognized(raw) => Cell::new(raw).fg(Color::Red),
        };

        table.add_row(vec![
            Cell::new(truncate(&mem.content, 60)).fg(Color::White),
            timeframe_cell,
            Cell::new(mem.created_at.format("%Y-%m-%d %H:%M").to_string()).fg(Color::DarkGrey),
            Cell::new(expiry_label(mem)).fg(Color::DarkGrey),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} memor{} in {}",
        style(memories.len()).bold(),
        if memories.len() == 1 { "y" } else { "ies" },
        style(state.config.memory.backend).dim(),
    );
    println!();

    Ok(())
}

/// Remove expired memories and report how many went.
pub async fn prune_memories(state: &AppState, json: bool) -> Result<()> {
    let removed = state
        .chat_service
        .prune()
        .await
        .context("Failed to prune memories")?;

    if json {
        println!("{}", serde_json::json!({ "removed": removed }));
    } else {
        println!();
        println!(
            "  {} Removed {} expired memor{}",
            style("✓").green().bold(),
            style(removed).bold(),
            if removed == 1 { "y" } else { "ies" }
        );
        println!();
    }

    Ok(())
}

/// When the record stops being live, if ever.
fn expires_at(record: &MemoryRecord) -> Option<DateTime<Utc>> {
    match retention(&record.timeframe) {
        Retention::Window(window) => Some(record.created_at + window),
        Retention::Forever => None,
        Retention::None => Some(record.created_at),
    }
}

fn expiry_label(record: &MemoryRecord) -> String {
    match expires_at(record) {
        Some(at) => at.format("%Y-%m-%d %H:%M").to_string(),
        None => "never".to_string(),
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let head: String = text.chars().take(max_chars - 3).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}
