//! CLI command definitions for the `keepsake` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod chat;
pub mod memory;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// A chat companion that remembers what matters, for as long as it matters.
#[derive(Parser)]
#[command(name = "keepsake", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true, env = "KEEPSAKE_OTEL")]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server.
    Serve {
        /// Port to listen on [default: from config, else 3000].
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to [default: from config, else 0.0.0.0].
        #[arg(long)]
        host: Option<String>,
    },

    /// Chat interactively in the terminal.
    Chat,

    /// Inspect and maintain stored memories.
    #[command(alias = "memory")]
    Memories {
        #[command(subcommand)]
        action: memory::MemoryCommand,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

/// Default tracing filter for the given verbosity flags.
pub fn log_filter(verbose: u8, quiet: bool) -> &'static str {
    match verbose {
        0 if quiet => "error",
        0 => "warn",
        1 => "info,keepsake=debug",
        _ => "trace",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_serve_overrides() {
        let cli = Cli::try_parse_from(["keepsake", "serve", "--port", "8080", "--host", "127.0.0.1"]).unwrap();
        match cli.command {
            Commands::Serve { port, host } => {
                assert_eq!(port, Some(8080));
                assert_eq!(host.as_deref(), Some("127.0.0.1"));
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn test_parse_memories_list_json() {
        let cli = Cli::try_parse_from(["keepsake", "memories", "list", "--json"]).unwrap();
        assert!(cli.json);
        assert!(matches!(
            cli.command,
            Commands::Memories { action: memory::MemoryCommand::List }
        ));
    }

    #[test]
    fn test_log_filter_levels() {
        assert_eq!(log_filter(0, true), "error");
        assert_eq!(log_filter(0, false), "warn");
        assert_eq!(log_filter(1, false), "info,keepsake=debug");
        assert_eq!(log_filter(3, false), "trace");
    }
}
