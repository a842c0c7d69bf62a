//! Slash command parsing for the chat loop.
//!
//! Commands start with `/`. A bare `exit` or `quit` also ends the chat.

use console::style;

/// Available slash commands in the chat loop.
#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    /// Show available commands.
    Help,
    /// Clear the terminal screen.
    Clear,
    /// Exit the chat.
    Exit,
    /// Show the live memories.
    Memories,
    /// Show this conversation's history.
    History,
    /// Forget this conversation's history (memories are kept).
    Reset,
    /// Unknown command.
    Unknown(String),
}

/// Parse user input as a command.
///
/// Returns `None` for ordinary chat messages.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if trimmed.eq_ignore_ascii_case("exit") || trimmed.eq_ignore_ascii_case("quit") {
        return Some(ChatCommand::Exit);
    }
    if !trimmed.starts_with('/') {
        return None;
    }

    let cmd = trimmed
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_lowercase();

    match cmd.as_str() {
        "/help" | "/h" | "/?" => Some(ChatCommand::Help),
        "/clear" | "/cls" => Some(ChatCommand::Clear),
        "/exit" | "/quit" | "/q" => Some(ChatCommand::Exit),
        "/memories" | "/mem" => Some(ChatCommand::Memories),
        "/history" => Some(ChatCommand::History),
        "/reset" => Some(ChatCommand::Reset),
        other => Some(ChatCommand::Unknown(other.to_string())),
    }
}

/// Help text listing all available commands.
pub fn help_text() -> String {
    let rows = [
        ("/help", "Show this help message"),
        ("/memories", "Show what is remembered right now"),
        ("/history", "Show this conversation"),
        ("/reset", "Start the conversation over (memories stay)"),
        ("/clear", "Clear the screen"),
        ("/exit", "End the chat"),
    ];

    let mut text = format!("\n  {}\n\n", style("Available commands:").bold());
    for (cmd, description) in rows {
        text.push_str(&format!("  {} {description}\n", style(format!("{cmd:<10}")).cyan()));
    }
    text.push_str(&format!(
        "\n  {}\n",
        style("Ctrl+D to exit, Ctrl+C is safe (no message loss)").dim()
    ));
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_help() {
        assert_eq!(parse("/help"), Some(ChatCommand::Help));
        assert_eq!(parse("/h"), Some(ChatCommand::Help));
        assert_eq!(parse("/?"), Some(ChatCommand::Help));
    }

    #[test]
    fn test_parse_exit_variants() {
        assert_eq!(parse("/exit"), Some(ChatCommand::Exit));
        assert_eq!(parse("/q"), Some(ChatCommand::Exit));
        assert_eq!(parse("exit"), Some(ChatCommand::Exit));
        assert_eq!(parse("  Quit "), Some(ChatCommand::Exit));
    }

    #[test]
    fn test_parse_memories_and_history() {
        assert_eq!(parse("/memories"), Some(ChatCommand::Memories));
        assert_eq!(parse("/mem"), Some(ChatCommand::Memories));
        assert_eq!(parse("/history"), Some(ChatCommand::History));
        assert_eq!(parse("/reset"), Some(ChatCommand::Reset));
    }

    #[test]
    fn test_parse_not_command() {
        assert_eq!(parse("hello world"), None);
        assert_eq!(parse("exit strategy for my startup?"), None);
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(parse("/foo bar"), Some(ChatCommand::Unknown("/foo".to_string())));
    }

    #[test]
    fn test_help_lists_commands() {
        let help = help_text();
        assert!(help.contains("/memories"));
        assert!(help.contains("/exit"));
    }
}
